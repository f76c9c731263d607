// Source document defaults
pub const DEFAULT_SOURCE_ENCODING: &str = "utf-8";
pub const DEFAULT_ROOT_ELEMENT: &str = "ISO_3166-1_List_en";
pub const DEFAULT_ENTRY_ELEMENT: &str = "ISO_3166-1_Entry";
pub const DEFAULT_COUNTRY_NAME_ELEMENT: &str = "ISO_3166-1_Country_name";
pub const DEFAULT_COUNTRY_CODE_ELEMENT: &str = "ISO_3166-1_Alpha-2_Code_element";

// Export defaults
pub const DEFAULT_EXPORT_DIR: &str = "Export";
pub const DEFAULT_EXPORT_FILENAME: &str = "Iso3166Countries.xml";

// Export document element names
pub const EXPORT_ROOT_ELEMENT: &str = "Countries";
pub const EXPORT_COUNTRY_ELEMENT: &str = "Country";
pub const EXPORT_NAME_ELEMENT: &str = "Name";
pub const EXPORT_CODE_ELEMENT: &str = "Code";

// Suffix of the temp file written before the final rename
pub const PARTIAL_FILE_SUFFIX: &str = ".part";

// Configuration lookup
pub const DEFAULT_CONFIG_FILE: &str = "Iso3166Countries.toml";
pub const CONTENT_ROOT_ENV: &str = "ISO3166_CONTENT_ROOT";

// Patterns
pub const OVERRIDE_GROUP_PATTERN: &str = r"^\{?\s*([^:{}]+?)\s*:\s*([^{}]*?)\s*\}?$";
pub const QUALIFIED_PATH_PATTERN: &str = r"^[a-zA-Z]:[/\\]";
