use crate::core::error::TransportError;
use crate::models::user::UserStatus;
use serde::Serialize;

/// Status filter. Numeric codes are meaningful, including `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatusFilter {
    Code(i64),
    Status(UserStatus),
}

/// Query parameters for the user list.
///
/// Paging numbers and text filters are sent only when set and non-empty, so
/// the backend applies its own defaults otherwise. `status` is sent whenever
/// it is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "is_unset")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "is_unset")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "is_unset")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "is_blank")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusFilter>,
}

fn is_unset(value: &Option<u32>) -> bool {
    !matches!(value, Some(n) if *n > 0)
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

impl ListParams {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    pub fn to_query_string(&self) -> Result<String, TransportError> {
        serde_urlencoded::to_string(self).map_err(|e| TransportError::Setup(e.to_string()))
    }

    /// `base` with the encoded query appended, if any
    pub fn to_path(&self, base: &str) -> Result<String, TransportError> {
        let query = self.to_query_string()?;
        if query.is_empty() {
            Ok(base.to_string())
        } else {
            Ok(format!("{}?{}", base, query))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_params_encode_nothing() {
        assert_eq!(ListParams::default().to_query_string().unwrap(), "");
        assert_eq!(ListParams::default().to_path("/api/user").unwrap(), "/api/user");
    }

    #[test]
    fn test_page_and_search() {
        let params = ListParams::page(2, 10).with_search("sok dara");
        assert_eq!(
            params.to_query_string().unwrap(),
            "page=2&limit=10&search=sok+dara"
        );
    }

    #[test]
    fn test_zero_and_blank_values_are_omitted() {
        let params = ListParams {
            page: Some(0),
            limit: Some(10),
            offset: Some(0),
            search: Some(String::new()),
            role: Some(String::new()),
            status: None,
        };
        assert_eq!(params.to_query_string().unwrap(), "limit=10");
    }

    #[test]
    fn test_status_zero_is_sent() {
        let params = ListParams::default().with_status(StatusFilter::Code(0));
        assert_eq!(params.to_query_string().unwrap(), "status=0");
    }

    #[test]
    fn test_status_name_is_sent() {
        let params = ListParams::default()
            .with_role("Admin")
            .with_status(StatusFilter::Status(UserStatus::Inactive));
        assert_eq!(
            params.to_query_string().unwrap(),
            "role=Admin&status=INACTIVE"
        );
    }

    #[test]
    fn test_all_keys_in_order() {
        let params = ListParams {
            page: Some(1),
            limit: Some(20),
            offset: Some(40),
            search: Some("a".into()),
            role: Some("2".into()),
            status: Some(StatusFilter::Code(1)),
        };
        assert_eq!(
            params.to_path("/api/user").unwrap(),
            "/api/user?page=1&limit=20&offset=40&search=a&role=2&status=1"
        );
    }
}
