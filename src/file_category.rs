/// Extension based categorization of files.
///
/// This module maps a file extension to a category folder name (e.g., "Images",
/// "Documents"). Lookup walks the categories in their declared order and the
/// first category listing the extension wins; unknown extensions land in
/// [`OTHERS`].
///
/// # Examples
///
/// ```
/// use dirsort::file_category::CategoryTable;
///
/// let table = CategoryTable::default();
/// assert_eq!(table.classify("png"), "Images");
/// assert_eq!(table.classify("PDF"), "Documents");
/// assert_eq!(table.classify("xyz"), "Others");
/// ```
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fallback category for extensions no category claims.
pub const OTHERS: &str = "Others";

/// Category that sorts its files into per-extension subfolders by default.
pub const DOCUMENTS: &str = "Documents";

/// A named group of extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Folder name created under the organized directory.
    pub name: String,
    /// Lower-case extensions without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Category {
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    fn normalized(mut self) -> Self {
        let mut seen: Vec<String> = Vec::with_capacity(self.extensions.len());
        for ext in self.extensions {
            let ext = ext.trim_start_matches('.').to_lowercase();
            if !ext.is_empty() && !seen.contains(&ext) {
                seen.push(ext);
            }
        }
        self.extensions = seen;
        self
    }

    fn matches(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }
}

/// Ordered category table plus the set of categories that nest files into an
/// upper-cased extension subfolder (`Documents/PDF/report.pdf`).
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
    subfolder_categories: Vec<String>,
}

impl CategoryTable {
    /// Builds a table from categories in lookup order.
    pub fn new(categories: Vec<Category>, subfolder_categories: Vec<String>) -> Self {
        Self {
            categories: categories.into_iter().map(Category::normalized).collect(),
            subfolder_categories,
        }
    }

    /// The built-in categories.
    pub fn standard_categories() -> Vec<Category> {
        vec![
            Category::new(DOCUMENTS, &["txt", "doc", "docx", "pdf", "rtf", "odt"]),
            Category::new("Images", &["jpg", "jpeg", "png", "gif", "bmp"]),
            Category::new("Audio", &["mp3", "wav", "ogg", "flac"]),
            Category::new("Videos", &["mp4", "avi", "mkv", "mov"]),
        ]
    }

    /// Builds a table with `custom` categories ahead of the standard ones.
    ///
    /// A custom category sharing a name with a standard one takes over its
    /// position at the front and keeps the standard extensions after its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::file_category::{Category, CategoryTable};
    ///
    /// let custom = vec![Category::new("Code", &["rs", "py"])];
    /// let table = CategoryTable::with_custom(&custom, vec!["Documents".to_string()]);
    /// assert_eq!(table.classify("rs"), "Code");
    /// assert_eq!(table.classify("mp3"), "Audio");
    /// ```
    pub fn with_custom(custom: &[Category], subfolder_categories: Vec<String>) -> Self {
        let mut standard = Self::standard_categories();
        let mut categories = Vec::with_capacity(custom.len() + standard.len());

        for category in custom {
            let mut merged = category.clone();
            if let Some(pos) = standard.iter().position(|c| c.name == category.name) {
                merged.extensions.extend(standard.remove(pos).extensions);
            }
            categories.push(merged);
        }
        categories.extend(standard);

        Self::new(categories, subfolder_categories)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Maps an extension to its category name. Matching is case-insensitive and
    /// tolerates a leading dot.
    pub fn classify(&self, ext: &str) -> &str {
        let ext = ext.trim_start_matches('.').to_lowercase();
        self.categories
            .iter()
            .find(|category| category.matches(&ext))
            .map(|category| category.name.as_str())
            .unwrap_or(OTHERS)
    }

    /// Whether files of `category` go into an upper-cased extension subfolder.
    pub fn uses_extension_subfolder(&self, category: &str) -> bool {
        self.subfolder_categories.iter().any(|c| c == category)
    }

    /// Folder under `root` where a file with extension `ext` belongs, together
    /// with its category name.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::file_category::CategoryTable;
    /// use std::path::Path;
    ///
    /// let table = CategoryTable::default();
    /// let (category, folder) = table.destination_folder(Path::new("/data"), "pdf");
    /// assert_eq!(category, "Documents");
    /// assert_eq!(folder, Path::new("/data/Documents/PDF"));
    /// ```
    pub fn destination_folder(&self, root: &Path, ext: &str) -> (String, PathBuf) {
        let category = self.classify(ext).to_string();
        let mut folder = root.join(&category);
        if !ext.is_empty() && self.uses_extension_subfolder(&category) {
            folder.push(ext.trim_start_matches('.').to_uppercase());
        }
        (category, folder)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(Self::standard_categories(), vec![DOCUMENTS.to_string()])
    }
}
