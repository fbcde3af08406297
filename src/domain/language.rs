//! Language profiles and universal classification tables

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Files that carry project context regardless of language (compared lower-cased).
pub const UNIVERSAL_CONTEXT_FILES: &[&str] = &[
    // documentation and intent
    "readme.md",
    "readme.txt",
    "architecture.md",
    "contributing.md",
    "design.md",
    // assistant instructions
    "claude.md",
    ".cursorrules",
    ".windsurfrules",
    // environment and infrastructure templates
    ".env.example",
    ".env.template",
    "docker-compose.yml",
    "dockerfile",
    "makefile",
    "justfile",
    "rakefile",
    "procfile",
];

/// Symbol kinds kept from the tagging tool; everything else is noise.
pub const CTAGS_KINDS: &[&str] = &[
    "class",
    "method",
    "function",
    "struct",
    "enum",
    "union",
    "interface",
    "typedef",
    "type",
    "namespace",
    "module",
    "package",
];

pub fn is_allowed_kind(kind: &str) -> bool {
    CTAGS_KINDS.contains(&kind)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    Python,
    JavaScript,
    Java,
    CSharp,
    Go,
    Cpp,
}

impl SupportedLanguage {
    pub const ALL: [SupportedLanguage; 6] = [
        SupportedLanguage::Python,
        SupportedLanguage::JavaScript,
        SupportedLanguage::Java,
        SupportedLanguage::CSharp,
        SupportedLanguage::Go,
        SupportedLanguage::Cpp,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SupportedLanguage::Python => "Python",
            SupportedLanguage::JavaScript => "JavaScript/TypeScript",
            SupportedLanguage::Java => "Java",
            SupportedLanguage::CSharp => "C#",
            SupportedLanguage::Go => "Go",
            SupportedLanguage::Cpp => "C/C++",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            SupportedLanguage::Python => "python",
            SupportedLanguage::JavaScript => "javascript",
            SupportedLanguage::Java => "java",
            SupportedLanguage::CSharp => "csharp",
            SupportedLanguage::Go => "go",
            SupportedLanguage::Cpp => "cpp",
        }
    }

    pub fn profile(&self) -> &'static LanguageProfile {
        &PROFILES[self]
    }
}

impl std::fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SupportedLanguage {
    type Err = String;

    /// Accepts an id, a common alias or the display name, case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() {
            return Err("No language provided".to_string());
        }
        let lang = match normalized.as_str() {
            "python" | "py" => SupportedLanguage::Python,
            "javascript" | "js" | "typescript" | "ts" | "javascript/typescript" => {
                SupportedLanguage::JavaScript
            }
            "java" | "kotlin" => SupportedLanguage::Java,
            "csharp" | "cs" | "c#" | "dotnet" => SupportedLanguage::CSharp,
            "go" | "golang" => SupportedLanguage::Go,
            "cpp" | "c" | "c++" | "c/c++" => SupportedLanguage::Cpp,
            _ => return Err(format!("Unsupported language: {}", value.trim())),
        };
        Ok(lang)
    }
}

/// Per-language heuristics consumed by the significance scorer.
///
/// All entries are stored lower-cased. Manifest entries starting with a dot
/// (`.csproj`) match on extension, the rest on full file name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguageProfile {
    pub manifests: BTreeSet<String>,
    pub extensions: BTreeSet<String>,
    pub signals: BTreeSet<String>,
    pub ignore_dirs: BTreeSet<String>,
}

impl LanguageProfile {
    pub fn new<M, E, S, I>(manifests: M, extensions: E, signals: S, ignore_dirs: I) -> Self
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            manifests: lower_set(manifests),
            extensions: lower_set(extensions),
            signals: lower_set(signals),
            ignore_dirs: lower_set(ignore_dirs),
        }
    }

    pub fn is_manifest(&self, name_lower: &str, suffix_lower: &str) -> bool {
        self.manifests.contains(name_lower)
            || (!suffix_lower.is_empty() && self.manifests.contains(suffix_lower))
    }

    pub fn is_source_extension(&self, suffix_lower: &str) -> bool {
        !suffix_lower.is_empty() && self.extensions.contains(suffix_lower)
    }

    pub fn is_signal(&self, stem_lower: &str, suffix_lower: &str) -> bool {
        self.signals.contains(stem_lower) && self.is_source_extension(suffix_lower)
    }

    pub fn in_ignored_dir<'a>(&self, mut parents: impl Iterator<Item = &'a String>) -> bool {
        parents.any(|dir| self.ignore_dirs.contains(dir.as_str()))
    }
}

fn lower_set<T>(items: T) -> BTreeSet<String>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    items.into_iter().map(|item| item.as_ref().to_lowercase()).collect()
}

static PROFILES: Lazy<BTreeMap<SupportedLanguage, LanguageProfile>> = Lazy::new(|| {
    let mut profiles = BTreeMap::new();
    profiles.insert(
        SupportedLanguage::Python,
        LanguageProfile::new(
            ["requirements.txt", "pyproject.toml", "setup.py", "pipfile", "tox.ini"],
            [".py", ".pyi"],
            [
                "__init__",
                "__main__",
                "main",
                "app",
                "wsgi",
                "asgi",
                "manage",
                "run",
                "application",
                "server",
            ],
            ["tests", "test", "mocks", "examples", "benchmarks", "scripts", "htmlcov", "docs"],
        ),
    );
    profiles.insert(
        SupportedLanguage::JavaScript,
        LanguageProfile::new(
            [
                "package.json",
                "deno.json",
                "yarn.lock",
                "pnpm-lock.yaml",
                "next.config.js",
                "vite.config.js",
                "tsconfig.json",
            ],
            [".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs", ".vue", ".svelte", ".astro"],
            ["index", "main", "app", "server", "entry", "bootstrap", "start"],
            [
                "tests",
                "__tests__",
                "mocks",
                "stories",
                "examples",
                "e2e",
                "cypress",
                "docs",
                "spec",
            ],
        ),
    );
    profiles.insert(
        SupportedLanguage::Java,
        LanguageProfile::new(
            ["pom.xml", "build.gradle", "build.gradle.kts", "settings.gradle", "mvnw", "gradlew"],
            [".java", ".kt", ".scala", ".groovy"],
            ["main", "application", "app"],
            ["test", "tests", "mocks", "examples", "samples", "docs", "it"],
        ),
    );
    profiles.insert(
        SupportedLanguage::CSharp,
        LanguageProfile::new(
            [".csproj", ".sln", ".fsproj", ".vbproj", "global.json", "nuget.config"],
            [".cs", ".fs", ".vb", ".cshtml", ".razor"],
            ["program", "startup", "app", "main", "module1"],
            ["tests", "test", "mocks", "examples", "spec", "samples", "TestResults"],
        ),
    );
    profiles.insert(
        SupportedLanguage::Go,
        LanguageProfile::new(
            ["go.mod", "go.sum", "go.work", "main.go"],
            [".go"],
            ["main", "server", "app", "cmd", "doc"],
            ["tests", "test", "examples", "vendor", "testdata", "mocks", "bench"],
        ),
    );
    profiles.insert(
        SupportedLanguage::Cpp,
        LanguageProfile::new(
            [
                "cmakelists.txt",
                "makefile",
                "configure.ac",
                "meson.build",
                "conanfile.txt",
                "vcpkg.json",
                ".gitmodules",
            ],
            [".c", ".cpp", ".h", ".hpp", ".cc", ".hh", ".cxx", ".hxx", ".m", ".mm"],
            ["main", "app", "application"],
            [
                "tests",
                "test",
                "mocks",
                "examples",
                "samples",
                "third_party",
                "vendor",
                "external",
            ],
        ),
    );
    profiles
});
