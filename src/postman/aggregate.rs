//! Combined collection grouped by API category

use std::path::Path;

use super::collection::{CategoryFolder, Collection, Folder, Info};

/// Display category of a plan, chosen by the name of its parent directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Pet,
    Store,
    User,
    Other,
}

impl Category {
    /// Output order of category folders
    pub const ALL: [Category; 4] = [Category::Pet, Category::Store, Category::User, Category::Other];

    pub fn from_dir_name(name: &str) -> Self {
        match name {
            "pet" => Self::Pet,
            "store" => Self::Store,
            "user" => Self::User,
            _ => Self::Other,
        }
    }

    /// Category of a plan file, from its immediate parent directory
    pub fn for_plan(path: &Path) -> Self {
        path.parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .map(Self::from_dir_name)
            .unwrap_or(Self::Other)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Pet => "Pet Operations",
            Self::Store => "Store Operations",
            Self::User => "User Operations",
            Self::Other => "Other",
        }
    }
}

/// Group the folders of many collections into category folders
///
/// Categories appear in [`Category::ALL`] order regardless of the order the
/// collections arrive in; categories without folders are left out.
pub fn aggregate<I>(collections: I, title: &str, generated: &str) -> Collection<CategoryFolder>
where
    I: IntoIterator<Item = (Category, Collection)>,
{
    let mut grouped: Vec<(Category, Vec<Folder>)> =
        Category::ALL.iter().map(|c| (*c, Vec::new())).collect();

    for (category, collection) in collections {
        if let Some((_, folders)) = grouped.iter_mut().find(|(c, _)| *c == category) {
            folders.extend(collection.item);
        }
    }

    let item: Vec<CategoryFolder> = grouped
        .into_iter()
        .filter(|(_, folders)| !folders.is_empty())
        .map(|(category, folders)| {
            let name = category.display_name();
            CategoryFolder {
                name: name.to_string(),
                item: folders,
                description: format!("All {} endpoints", name.to_lowercase()),
            }
        })
        .collect();

    let mut description = format!(
        "Complete API test collection with all endpoints\nGenerated: {generated}"
    );
    if !item.is_empty() {
        description.push_str("\n\nIncludes:");
        for category in &item {
            description.push_str(&format!("\n- {}", category.name));
        }
    }

    Collection {
        info: Info::new(title, description),
        item,
    }
}
