// Various default functions to be used by serde

use url::Url;

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_backend_url() -> Url {
    Url::parse("http://127.0.0.1:5000").expect("static backend url is valid")
}

pub(crate) fn default_data_path() -> String {
    "/get-initial-data".into()
}

pub(crate) fn default_compiler_url() -> Url {
    Url::parse("https://generativelanguage.googleapis.com/v1beta")
        .expect("static compiler url is valid")
}

pub(crate) fn default_model() -> String {
    "gemini-2.5-flash-preview-05-20".into()
}

pub(crate) fn default_credential_key() -> String {
    "geminiApiKey".into()
}

pub(crate) fn default_title() -> String {
    "DSL Frontend Compiler".into()
}

pub(crate) fn default_region_id() -> String {
    "output".into()
}

pub(crate) fn default_head_assets() -> Vec<String> {
    vec![r#"<script src="https://cdn.tailwindcss.com"></script>"#.into()]
}
