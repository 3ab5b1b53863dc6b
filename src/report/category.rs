//! Coarse file categories for the report overview.

use std::path::Path;

/// What kind of file a path is, judged from its location and extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    GuidanceDocument,
    SourceCode,
    Tests,
    Documentation,
    ProjectDocs,
    Configuration,
    CiConfig,
    Frontend,
    Database,
    Scripts,
    Protocol,
    Executable,
    Other,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::GuidanceDocument => "Guidance document",
            Category::SourceCode => "Source code",
            Category::Tests => "Tests",
            Category::Documentation => "Documentation",
            Category::ProjectDocs => "Project docs",
            Category::Configuration => "Configuration",
            Category::CiConfig => "CI configuration",
            Category::Frontend => "Frontend",
            Category::Database => "Database",
            Category::Scripts => "Scripts",
            Category::Protocol => "Protocol definitions",
            Category::Executable => "Executables",
            Category::Other => "Other",
        }
    }
}

const SOURCE_EXTENSIONS: &[&str] = &[
    "rs", "py", "js", "jsx", "ts", "tsx", "java", "kt", "go", "c", "h", "cc", "cpp", "hpp",
    "cs", "rb", "swift", "php", "scala",
];
const DOC_EXTENSIONS: &[&str] = &["md", "txt", "rst", "adoc"];
const CONFIG_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "xml", "ini", "toml", "cfg", "conf"];
const FRONTEND_EXTENSIONS: &[&str] = &["html", "css", "scss", "less", "vue", "svelte"];
const DATABASE_EXTENSIONS: &[&str] = &["sql", "db"];
const SCRIPT_EXTENSIONS: &[&str] = &["sh", "bash", "bat", "ps1"];
const PROTOCOL_EXTENSIONS: &[&str] = &["proto", "thrift", "graphql"];

const PROJECT_DOC_PREFIXES: &[&str] = &["readme", "license", "changelog", "contributing"];

/// Classify a repository-relative path with `/` separators.
pub fn classify(path: &str, guidance_path: &str) -> Category {
    if path == guidance_path {
        return Category::GuidanceDocument;
    }
    if path.starts_with(".github/") {
        return Category::CiConfig;
    }
    if is_test_path(path) {
        return Category::Tests;
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    let lower = file_name.to_ascii_lowercase();
    if PROJECT_DOC_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return Category::ProjectDocs;
    }

    if !lower.contains('.') {
        return Category::Executable;
    }
    let Some(ext) = Path::new(&lower).extension().and_then(|e| e.to_str()) else {
        return Category::Other;
    };
    let table: [(&[&str], Category); 7] = [
        (SOURCE_EXTENSIONS, Category::SourceCode),
        (DOC_EXTENSIONS, Category::Documentation),
        (CONFIG_EXTENSIONS, Category::Configuration),
        (FRONTEND_EXTENSIONS, Category::Frontend),
        (DATABASE_EXTENSIONS, Category::Database),
        (SCRIPT_EXTENSIONS, Category::Scripts),
        (PROTOCOL_EXTENSIONS, Category::Protocol),
    ];
    table
        .iter()
        .find(|(exts, _)| exts.contains(&ext))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}

fn is_test_path(path: &str) -> bool {
    let mut parts: Vec<&str> = path.split('/').collect();
    let file_name = parts.pop().unwrap_or_default().to_ascii_lowercase();

    if parts
        .iter()
        .any(|dir| matches!(*dir, "test" | "tests" | "__tests__" | "spec"))
    {
        return true;
    }

    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(&file_name);
    stem == "test"
        || stem == "tests"
        || stem.starts_with("test_")
        || stem.ends_with("_test")
        || stem.ends_with("_tests")
        || stem.ends_with(".test")
        || stem.ends_with(".spec")
}
