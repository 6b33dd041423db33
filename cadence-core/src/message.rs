//! Commit message heuristic.
//!
//! A batch of paths is profiled once, then matched against [`RULES`] in
//! order; the first rule whose predicate holds builds the message.

use std::path::Path;

const MARKUP_EXTS: &[&str] = &["html", "htm"];
const SCRIPT_EXTS: &[&str] = &["js", "mjs", "cjs", "ts", "jsx", "tsx"];
const STYLE_EXTS: &[&str] = &["css", "scss", "sass", "less"];
const DOC_EXTS: &[&str] = &["md", "markdown"];
const DATABASE_EXTS: &[&str] = &["sql", "dbml"];
const DATABASE_WORDS: &[&str] = &["schema", "database", "diagram"];
const DATABASE_STEMS: &[&str] = &["erd", "db"];
const CONFIG_FILES: &[&str] = &[
    "package.json",
    "package-lock.json",
    "yarn.lock",
    ".gitignore",
    ".npmignore",
    "jest.config.js",
    "jest.config.ts",
    "vitest.config.js",
    "vitest.config.ts",
    "karma.conf.js",
    "cypress.config.js",
];
const SCRIPT_DIRS: &[&str] = &["scripts", "script", "js"];
const ASSET_DIRS: &[&str] = &["assets", "images", "img", "media", "static", "fonts"];

// ---------------------------------------------------------------------------
// Batch profile
// ---------------------------------------------------------------------------

/// Name parts of one path, lower-cased.
#[derive(Debug, Clone)]
struct FileFacts {
    path: String,
    name: String,
    stem: String,
    ext: String,
    dirs: Vec<String>,
}

impl FileFacts {
    fn new(raw: &str) -> Self {
        let path = raw.replace('\\', "/").to_lowercase();
        let p = Path::new(&path);
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = p
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = p
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut dirs: Vec<String> = path
            .split('/')
            .filter(|c| !c.is_empty() && *c != ".")
            .map(str::to_string)
            .collect();
        dirs.pop();
        Self {
            path,
            name,
            stem,
            ext,
            dirs,
        }
    }

    fn has_ext(&self, exts: &[&str]) -> bool {
        exts.contains(&self.ext.as_str())
    }

    fn is_markup(&self) -> bool {
        self.has_ext(MARKUP_EXTS)
    }

    fn is_script(&self) -> bool {
        self.has_ext(SCRIPT_EXTS)
    }

    fn is_database(&self) -> bool {
        self.has_ext(DATABASE_EXTS)
            || DATABASE_WORDS.iter().any(|w| self.name.contains(w))
            || DATABASE_STEMS.contains(&self.stem.as_str())
    }

    fn in_script_dir(&self) -> bool {
        self.dirs.iter().any(|d| SCRIPT_DIRS.contains(&d.as_str()))
    }

    fn in_asset_dir(&self) -> bool {
        self.dirs
            .first()
            .is_some_and(|d| ASSET_DIRS.contains(&d.as_str()))
    }
}

/// Everything the rules look at, computed once per batch.
#[derive(Debug, Clone)]
pub struct BatchProfile {
    files: Vec<FileFacts>,
}

impl BatchProfile {
    pub fn new<S: AsRef<str>>(paths: &[S]) -> Self {
        Self {
            files: paths.iter().map(|p| FileFacts::new(p.as_ref())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn any(&self, f: impl Fn(&FileFacts) -> bool) -> bool {
        self.files.iter().any(f)
    }

    fn has_markup(&self) -> bool {
        self.any(FileFacts::is_markup)
    }

    fn has_script(&self) -> bool {
        self.any(FileFacts::is_script)
    }

    fn has_style(&self) -> bool {
        self.any(|f| f.has_ext(STYLE_EXTS))
    }

    fn first_page(&self) -> &str {
        self.files
            .iter()
            .find(|f| f.is_markup())
            .map(|f| f.stem.as_str())
            .unwrap_or("main")
    }

    fn first_module(&self) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.is_script() && f.in_script_dir())
            .map(|f| f.stem.as_str())
    }

    /// Broad categories present, in fixed order.
    pub fn categories(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.has_markup() {
            out.push("HTML");
        }
        if self.has_script() {
            out.push("JavaScript");
        }
        if self.has_style() {
            out.push("CSS");
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// One entry of the priority table.
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&BatchProfile) -> bool,
    pub message: fn(&BatchProfile) -> String,
}

/// Evaluated top to bottom; the last rule always applies.
pub const RULES: &[Rule] = &[
    Rule {
        name: "database",
        applies: |b| b.any(FileFacts::is_database),
        message: |_| "Add database schema and documentation files".to_string(),
    },
    Rule {
        name: "config",
        applies: |b| b.any(|f| CONFIG_FILES.contains(&f.name.as_str())),
        message: |_| "Initialize project configuration files".to_string(),
    },
    Rule {
        name: "page-structure",
        applies: |b| b.has_markup() && !b.has_script(),
        message: |b| format!("Add {} page HTML structure", b.first_page()),
    },
    Rule {
        name: "page-functionality",
        applies: |b| b.has_markup() && b.has_script(),
        message: |b| format!("Implement {} page functionality", b.first_page()),
    },
    Rule {
        name: "scripts",
        applies: |b| b.has_script() && !b.has_markup(),
        message: |b| match b.first_module() {
            Some(module) => format!("Add {module} module implementation"),
            None => "Add utility scripts and helpers".to_string(),
        },
    },
    Rule {
        name: "styling",
        applies: BatchProfile::has_style,
        message: |_| "Add styling and CSS files".to_string(),
    },
    Rule {
        name: "assets",
        applies: |b| b.any(FileFacts::in_asset_dir),
        message: |_| "Add assets and media files".to_string(),
    },
    Rule {
        name: "tests",
        applies: |b| b.any(|f| f.path.contains("test")),
        message: |_| "Add unit and integration tests".to_string(),
    },
    Rule {
        name: "docs",
        applies: |b| b.any(|f| f.has_ext(DOC_EXTS)),
        message: |_| "Add project documentation".to_string(),
    },
    Rule {
        name: "generic",
        applies: |_| true,
        message: generic_message,
    },
];

fn generic_message(batch: &BatchProfile) -> String {
    let types = batch.categories();
    if types.is_empty() {
        format!("Add project files ({} files)", batch.len())
    } else {
        format!("Add {} files", types.join(", "))
    }
}

fn select(batch: &BatchProfile) -> &'static Rule {
    RULES
        .iter()
        .find(|rule| (rule.applies)(batch))
        .unwrap_or(&RULES[RULES.len() - 1])
}

/// The first rule matching `paths`.
pub fn matching_rule<S: AsRef<str>>(paths: &[S]) -> &'static Rule {
    select(&BatchProfile::new(paths))
}

/// Build the commit message for a non-empty batch of repository paths.
pub fn commit_message<S: AsRef<str>>(paths: &[S]) -> String {
    let batch = BatchProfile::new(paths);
    (select(&batch).message)(&batch)
}
