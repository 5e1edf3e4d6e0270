use serde::{Deserialize, Deserializer, Serialize};

// GitHub API response structures

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    pub avatar_url: String,
}

/// A repository as kept in the persisted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub owner: Owner,
}

impl RepositoryRef {
    /// Detail route for this repository, with the full name URL-encoded.
    pub fn route(&self) -> String {
        repository_route(&self.full_name)
    }
}

/// The full name travels as one path segment, so `/` is escaped as `%2F`.
pub fn repository_route(full_name: &str) -> String {
    // byte_serialize escapes a literal '+' as %2B, so any '+' left is a space
    let encoded: String = url::form_urlencoded::byte_serialize(full_name.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    format!("/repository/{}", encoded)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDetail {
    #[serde(flatten)]
    pub repository: RepositoryRef,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueUser {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub html_url: String,
    pub user: IssueUser,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
