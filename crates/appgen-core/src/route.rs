use serde::Serialize;

use crate::spec::PageDescriptor;

/// Fallback collection for pages whose path carries no usable segment.
pub const DEFAULT_COLLECTION: &str = "items";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    List,
    Detail,
}

/// The dynamic segment a detail page is keyed by, e.g. `[slug]` or `[...parts]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteParam {
    pub name: String,
    /// `[...name]` and `[[...name]]` receive a list of segments.
    pub catch_all: bool,
}

impl RouteParam {
    /// Parse a bracketed segment. Anything else yields `None`.
    pub fn parse(segment: &str) -> Option<Self> {
        let inner = segment.strip_prefix('[')?.strip_suffix(']')?;
        let inner = inner
            .strip_prefix('[')
            .and_then(|i| i.strip_suffix(']'))
            .unwrap_or(inner);
        let (name, catch_all) = match inner.strip_prefix("...") {
            Some(rest) => (rest, true),
            None => (inner, false),
        };
        is_identifier(name).then(|| Self {
            name: name.to_string(),
            catch_all,
        })
    }
}

/// Where a non-root page lives in the generated tree and which fixture
/// collection it reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRoute {
    pub path: String,
    pub segments: Vec<String>,
    pub kind: PageKind,
    pub collection: String,
    pub singular: String,
    /// Set for detail pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<RouteParam>,
}

impl PageRoute {
    /// Classify a page descriptor. Returns `None` for the root page, which is
    /// served by the marketing template.
    pub fn from_descriptor(page: &PageDescriptor) -> Option<Self> {
        let segments: Vec<String> = page
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let last = segments.last()?;

        let (kind, param) = if last.starts_with('[') {
            let param = RouteParam::parse(last).unwrap_or_else(|| RouteParam {
                name: "id".to_string(),
                catch_all: false,
            });
            (PageKind::Detail, Some(param))
        } else {
            (PageKind::List, None)
        };

        let (collection, singular) = match page.entity() {
            Some(entity) => {
                let lower = entity.to_lowercase();
                (pluralize(&lower), singularize(&lower))
            }
            None => {
                let collection = segments
                    .first()
                    .filter(|s| !s.starts_with('['))
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
                let singular = singularize(&collection);
                (collection, singular)
            }
        };

        Some(Self {
            path: page.path().to_string(),
            segments,
            kind,
            collection,
            singular,
            param,
        })
    }

    /// Output path of the page module, relative to the project root.
    pub fn file_path(&self) -> String {
        format!("src/app/{}/page.tsx", self.segments.join("/"))
    }

    /// Relative import prefix from the page directory back to `src/`.
    pub fn rel_to_src(&self) -> String {
        vec![".."; self.segments.len() + 1].join("/")
    }
}

/// Why `path` cannot be used as a page route, if it cannot.
///
/// Routes must be absolute URL paths whose segments stay inside `src/app`:
/// no `.`/`..`, no backslashes or drive separators, and bracketed segments
/// must name a parameter.
pub fn page_path_problem(path: &str) -> Option<&'static str> {
    if !path.starts_with('/') {
        return Some("must start with '/'");
    }
    if path.contains(['\\', ':', '\0']) {
        return Some("must not contain '\\', ':' or NUL characters");
    }
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Some("must not contain '.' or '..' segments");
        }
        if segment.starts_with('[') && RouteParam::parse(segment).is_none() {
            return Some("has a dynamic segment that does not name a parameter");
        }
    }
    None
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Append `s` unless the word already ends in one.
pub fn pluralize(word: &str) -> String {
    if word.ends_with('s') {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

pub fn singularize(word: &str) -> String {
    word.strip_suffix('s').unwrap_or(word).to_string()
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{PagePurpose, PageSpec};

    fn route(path: &str) -> Option<PageRoute> {
        PageRoute::from_descriptor(&PageDescriptor::Path(path.into()))
    }

    #[test]
    fn root_has_no_route() {
        assert!(route("/").is_none());
        assert!(route("").is_none());
    }

    #[test]
    fn list_page_takes_collection_from_first_segment() {
        let r = route("/books").unwrap();
        assert_eq!(r.kind, PageKind::List);
        assert_eq!(r.collection, "books");
        assert_eq!(r.singular, "book");
        assert_eq!(r.file_path(), "src/app/books/page.tsx");
        assert_eq!(r.rel_to_src(), "../..");
    }

    #[test]
    fn bracketed_last_segment_is_detail() {
        let r = route("/items/[id]").unwrap();
        assert_eq!(r.kind, PageKind::Detail);
        assert_eq!(r.collection, "items");
        assert_eq!(r.file_path(), "src/app/items/[id]/page.tsx");
        assert_eq!(r.rel_to_src(), "../../..");
    }

    #[test]
    fn entity_hint_wins_over_path() {
        let page = PageDescriptor::Detailed(PageSpec {
            path: "/library/[id]".into(),
            purpose: PagePurpose::Detail,
            entity: Some("Book".into()),
            sections: None,
        });
        let r = PageRoute::from_descriptor(&page).unwrap();
        assert_eq!(r.collection, "books");
        assert_eq!(r.singular, "book");
        assert_eq!(r.kind, PageKind::Detail);
    }

    #[test]
    fn dynamic_only_path_falls_back_to_items() {
        let r = route("/[slug]").unwrap();
        assert_eq!(r.collection, DEFAULT_COLLECTION);
        assert_eq!(r.singular, "item");
    }

    #[test]
    fn detail_param_is_taken_from_the_last_segment() {
        let r = route("/books/[slug]").unwrap();
        assert_eq!(
            r.param,
            Some(RouteParam {
                name: "slug".into(),
                catch_all: false
            })
        );
        let r = route("/docs/[...parts]").unwrap();
        assert_eq!(r.kind, PageKind::Detail);
        assert!(r.param.as_ref().unwrap().catch_all);
        assert_eq!(r.param.unwrap().name, "parts");
        assert_eq!(RouteParam::parse("[[...rest]]").unwrap().name, "rest");
        assert!(route("/books").unwrap().param.is_none());
    }

    #[test]
    fn escaping_paths_are_rejected() {
        for bad in [
            "/../../escaped",
            "/items/./x",
            "/items/..",
            "items",
            "/a\\b",
            "/c:/windows",
            "/items/[../x]",
            "/items/[]",
        ] {
            assert!(page_path_problem(bad).is_some(), "{bad}");
        }
        for good in ["/", "/items", "/items/[id]", "/docs/[...parts]", "/my-books/[book_id]"] {
            assert_eq!(page_path_problem(good), None, "{good}");
        }
    }

    #[test]
    fn plural_rules() {
        assert_eq!(pluralize("book"), "books");
        assert_eq!(pluralize("news"), "news");
        assert_eq!(singularize("books"), "book");
        assert_eq!(singularize("item"), "item");
        assert_eq!(capitalize("book"), "Book");
    }
}
