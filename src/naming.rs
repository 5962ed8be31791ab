use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

/// Maps a declared struct field name to the parameter name it answers to.
pub type NameMapper = Arc<dyn Fn(&str) -> String + Send + Sync>;

static FIRST_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("valid pattern"));
static ALL_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z0-9])([A-Z])").expect("valid pattern"));

/// Converts a field name to snake case: `FullName` becomes `full_name`.
///
/// Names that are already snake case pass through unchanged.
///
/// ```
/// use sqlx_named_params::naming::snake_case;
///
/// assert_eq!(snake_case("FullName"), "full_name");
/// assert_eq!(snake_case("HTTPServer"), "http_server");
/// assert_eq!(snake_case("user_id"), "user_id");
/// ```
pub fn snake_case(name: &str) -> String {
    let snake = FIRST_CAP.replace_all(name, "${1}_${2}");
    let snake = ALL_CAP.replace_all(&snake, "${1}_${2}");
    snake.to_lowercase()
}

/// How record fields are matched against placeholder names.
#[derive(Clone)]
pub struct Naming {
    tag_key: String,
    mapper: NameMapper,
}

impl Naming {
    pub fn new<K, F>(tag_key: K, mapper: F) -> Self
    where
        K: Into<String>,
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            tag_key: tag_key.into(),
            mapper: Arc::new(mapper),
        }
    }

    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    pub fn map_name(&self, field: &str) -> String {
        (self.mapper)(field)
    }

    pub(crate) fn set_tag_key(&mut self, tag_key: String) {
        self.tag_key = tag_key;
    }

    pub(crate) fn set_mapper(&mut self, mapper: NameMapper) {
        self.mapper = mapper;
    }
}

impl Default for Naming {
    fn default() -> Self {
        Self::new("db", snake_case)
    }
}

impl fmt::Debug for Naming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Naming")
            .field("tag_key", &self.tag_key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("ID"), "id");
        assert_eq!(snake_case("UserID"), "user_id");
        assert_eq!(snake_case("FullName"), "full_name");
        assert_eq!(snake_case("fullName"), "full_name");
        assert_eq!(snake_case("Age2Years"), "age2_years");
        assert_eq!(snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn test_default_naming() {
        let naming = Naming::default();
        assert_eq!(naming.tag_key(), "db");
        assert_eq!(naming.map_name("CreatedAt"), "created_at");
    }

    #[test]
    fn test_custom_mapper() {
        let naming = Naming::new("sql", |name: &str| name.to_uppercase());
        assert_eq!(naming.tag_key(), "sql");
        assert_eq!(naming.map_name("id"), "ID");
    }
}
