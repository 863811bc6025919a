use serde::{Deserialize, Serialize};

/// Host page the output region lives in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "crate::defaults::default_title")]
    pub title: String,

    /// Id of the element the pipeline owns and replaces on every compile
    #[serde(default = "crate::defaults::default_region_id")]
    pub region_id: String,

    /// Raw markup inserted into `<head>`, Tailwind CDN by default
    #[serde(default = "crate::defaults::default_head_assets")]
    pub head_assets: Vec<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: crate::defaults::default_title(),
            region_id: crate::defaults::default_region_id(),
            head_assets: crate::defaults::default_head_assets(),
        }
    }
}
