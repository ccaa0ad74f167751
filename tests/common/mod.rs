//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_core();
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::documents;
    pub use super::TestFixture;
}

/// Canned document JSON for testing.
#[allow(dead_code)]
pub mod documents {
    /// A small but complete core document: two dimensions, collections,
    /// taxonomies, platforms, themes, and an alias token.
    pub const CORE: &str = r##"{
  "systemId": "design-system",
  "systemName": "Acme Design System",
  "version": "2.0.0",
  "resolvedValueTypes": [
    {"id": "color", "displayName": "Color"},
    {"id": "spacing", "displayName": "Spacing"}
  ],
  "tokenCollections": [
    {"id": "collection-brand", "name": "Brand", "resolvedValueTypeIds": ["color"]},
    {"id": "collection-space", "name": "Space", "resolvedValueTypeIds": ["spacing"]}
  ],
  "dimensions": [
    {
      "id": "dim-scheme",
      "displayName": "Color Scheme",
      "resolvedValueTypeIds": ["color"],
      "defaultMode": "mode-light",
      "required": true,
      "modes": [
        {"id": "mode-light", "name": "Light", "dimensionId": "dim-scheme"},
        {"id": "mode-dark", "name": "Dark", "dimensionId": "dim-scheme"}
      ]
    },
    {
      "id": "dim-density",
      "displayName": "Density",
      "resolvedValueTypeIds": ["spacing"],
      "modes": [
        {"id": "mode-compact", "name": "Compact", "dimensionId": "dim-density"},
        {"id": "mode-comfortable", "name": "Comfortable", "dimensionId": "dim-density"}
      ]
    }
  ],
  "dimensionOrder": ["dim-scheme", "dim-density"],
  "platforms": [
    {"id": "platform-ios", "displayName": "iOS"},
    {"id": "platform-web", "displayName": "Web"}
  ],
  "themes": [
    {"id": "theme-light", "displayName": "Light", "isDefault": true},
    {"id": "theme-dark", "displayName": "Dark"}
  ],
  "taxonomies": [
    {
      "id": "tax-role",
      "name": "Role",
      "terms": [
        {"id": "term-accent", "name": "Accent"},
        {"id": "term-neutral", "name": "Neutral"}
      ]
    }
  ],
  "taxonomyOrder": ["tax-role"],
  "tokens": [
    {
      "id": "token-blue-500",
      "displayName": "Blue 500",
      "resolvedValueTypeId": "color",
      "tokenCollectionId": "collection-brand",
      "themeable": true,
      "taxonomies": [{"taxonomyId": "tax-role", "termId": "term-accent"}],
      "valuesByMode": [
        {"modeIds": ["mode-light"], "value": {"value": "#0055ff"}},
        {"modeIds": ["mode-dark"], "value": {"value": "#3377ff"}}
      ]
    },
    {
      "id": "token-primary",
      "displayName": "Primary",
      "resolvedValueTypeId": "color",
      "tokenCollectionId": "collection-brand",
      "themeable": true,
      "valuesByMode": [
        {"modeIds": [], "value": {"tokenId": "token-blue-500"}}
      ]
    },
    {
      "id": "token-space-m",
      "displayName": "Space M",
      "resolvedValueTypeId": "spacing",
      "tokenCollectionId": "collection-space",
      "valuesByMode": [
        {"modeIds": ["mode-compact"], "value": {"value": 12}},
        {"modeIds": ["mode-comfortable"], "value": {"value": 16}}
      ]
    }
  ],
  "platformExtensionFiles": {
    "platform-ios": {
      "repositoryUri": "acme/design-ios",
      "branch": "main",
      "filePath": "ext.json"
    }
  },
  "linkedRepositories": [
    {
      "id": "theme-dark",
      "type": "theme-override",
      "repositoryUri": "acme/design-themes",
      "filePath": "dark.json"
    }
  ],
  "figmaConfiguration": {"fileColorProfile": "srgb"}
}"##;

    /// An iOS platform extension: one override, one addition, one omitted
    /// mode, and a color profile override.
    pub const PLATFORM_IOS: &str = r##"{
  "systemId": "design-system",
  "platformId": "platform-ios",
  "version": "1.2.0",
  "figmaFileKey": "fig-ios",
  "fileColorProfile": "display-p3",
  "tokenOverrides": [
    {
      "id": "token-blue-500",
      "displayName": "Blue 500",
      "resolvedValueTypeId": "color",
      "themeable": true,
      "valuesByMode": [
        {"modeIds": ["mode-light"], "value": {"value": "#0a84ff"}},
        {"modeIds": ["mode-dark"], "value": {"value": "#409cff"}}
      ]
    },
    {
      "id": "token-ios-blur",
      "displayName": "iOS Blur",
      "resolvedValueTypeId": "color",
      "valuesByMode": [
        {"modeIds": ["mode-light"], "value": {"value": "#ffffffcc"}}
      ]
    }
  ],
  "omittedModes": ["mode-compact"],
  "omittedDimensions": []
}"##;

    /// A dark-theme override file patching one token's mode values.
    pub const THEME_DARK: &str = r##"{
  "systemId": "design-system",
  "themeId": "theme-dark",
  "tokenOverrides": [
    {
      "tokenId": "token-blue-500",
      "valuesByMode": [
        {"modeIds": ["mode-dark"], "value": {"value": "#99bbff"}}
      ]
    }
  ]
}"##;

    /// A core document with dangling references for failure testing.
    pub const INVALID_CORE: &str = r#"{
  "systemId": "design-system",
  "resolvedValueTypes": [{"id": "color", "displayName": "Color"}],
  "tokenCollections": [],
  "dimensions": [],
  "platforms": [],
  "tokens": [
    {
      "id": "token-broken",
      "displayName": "Broken",
      "resolvedValueTypeId": "elevation",
      "tokenCollectionId": "collection-missing",
      "valuesByMode": [
        {"modeIds": [], "value": {"tokenId": "token-ghost"}}
      ]
    }
  ]
}"#;

    /// A platform extension that belongs to a different system.
    pub const FOREIGN_EXTENSION: &str = r#"{
  "systemId": "other-system",
  "platformId": "platform-ios",
  "version": "1.0.0",
  "tokenOverrides": []
}"#;

    /// Not a document of any known kind.
    pub const UNKNOWN_SHAPE: &str = r#"{"hello": "world"}"#;
}

/// A test fixture that provides a temporary directory populated with
/// document files.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new().with_core().with_platform_extension();
///
/// let mut cmd = fixture.command();
/// cmd.arg("validate").arg("core.json").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add the canned core document as `core.json`.
    pub fn with_core(self) -> Self {
        self.with_file("core.json", documents::CORE)
    }

    /// Add the canned iOS extension where the core's wiring expects it
    /// (`acme/design-ios/ext.json`).
    pub fn with_platform_extension(self) -> Self {
        self.with_file("acme/design-ios/ext.json", documents::PLATFORM_IOS)
    }

    /// Add the canned dark theme override where the core's wiring expects
    /// it (`acme/design-themes/dark.json`).
    pub fn with_theme_override(self) -> Self {
        self.with_file("acme/design-themes/dark.json", documents::THEME_DARK)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of a file inside the fixture directory.
    pub fn file(&self, path: &str) -> std::path::PathBuf {
        self.temp_dir.path().join(path)
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("token-loom");
        cmd.current_dir(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
