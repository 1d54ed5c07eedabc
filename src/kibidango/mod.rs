mod extractor;

pub use extractor::KibidangoExtractor;

/// The project page watched when nothing else is configured.
pub const DEFAULT_PROJECT_URL: &str = "https://kibidango.com/2879";
pub const DEFAULT_PROJECT_NAME: &str = "Kibidango プロジェクト";
pub const DEFAULT_LABELS: [&str; 2] = ["auto-generated", "kibidango-update"];
