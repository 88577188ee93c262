use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// 1 行分の `users` レコード。
/// 列名をそのまま JSON キーにするので、フィールド名は `firstname` / `lastname` 固定。
/// NULL 列は `None` になり、JSON では `null` として出力される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl User {
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        User {
            firstname: Some(firstname.into()),
            lastname: Some(lastname.into()),
        }
    }
}

/// 列名で値を取り出す。
/// `Row::get` は型不一致で panic するため、`try_get` でエラーとして返している。
impl TryFrom<&Row> for User {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(User {
            firstname: row.try_get("firstname")?,
            lastname: row.try_get("lastname")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("Arthur", "Dent");

        assert_eq!(user.firstname.as_deref(), Some("Arthur"));
        assert_eq!(user.lastname.as_deref(), Some("Dent"));
    }

    #[test]
    fn test_user_serialization() {
        let user = User::new("Zaphod", "Beeblebrox");

        let json = serde_json::to_string(&user).expect("Failed to serialize user");
        assert_eq!(json, r#"{"firstname":"Zaphod","lastname":"Beeblebrox"}"#);
    }

    #[test]
    fn test_null_column_serializes_as_null() {
        let user = User {
            firstname: Some("Marvin".to_string()),
            lastname: None,
        };

        let value = serde_json::to_value(&user).expect("Failed to serialize user");
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(object["firstname"], "Marvin");
        assert!(object["lastname"].is_null());
    }

    #[test]
    fn test_user_list_serialization() {
        let users = vec![User::new("Ford", "Prefect"), User::new("Tricia", "McMillan")];

        let json = serde_json::to_string(&users).expect("Failed to serialize users");
        assert_eq!(
            json,
            r#"[{"firstname":"Ford","lastname":"Prefect"},{"firstname":"Tricia","lastname":"McMillan"}]"#
        );
    }
}
