//! Destination connection model.
//!
//! The set of destination vendors is closed: each variant carries its own
//! connection-detail record, and every vendor-specific decision goes through
//! a single exhaustive match rather than per-call-site switches.
//!
//! Credential material (passwords, access tokens, service-account blobs) is
//! wrapped in [`Secret`], which redacts on `Serialize`, `Debug`, and
//! `Display`. Serialized connection details are therefore always safe to log
//! or return to the dashboard; code that genuinely needs the raw value calls
//! [`Secret::expose`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Credential material that never leaves the process unredacted.
///
/// Deserializes from the raw wire value, but serializes, debugs, and
/// displays as `****`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps a raw credential value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw credential value.
    ///
    /// Only the code paths that hand credentials to a vendor client should
    /// call this; everything else works with the redacted forms.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for Secret {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str("****")
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

fn default_basic_auth() -> String {
    "basic".to_string()
}

fn default_access_token_auth() -> String {
    "access_token".to_string()
}

fn default_service_account_auth() -> String {
    "service_account".to_string()
}

fn default_stage_name() -> String {
    "WHARF".to_string()
}

fn default_true() -> bool {
    true
}

/// Connection details for a Redshift destination staged through S3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedshiftConnection {
    /// Authentication mechanism.
    #[serde(default = "default_basic_auth")]
    pub auth_type: String,
    /// Cluster endpoint hostname.
    pub host: String,
    /// Login user.
    pub user: String,
    /// Login password.
    pub password: Secret,
    /// Cluster port.
    pub port: u16,
    /// Target database.
    pub database: String,
    /// Schema the export lands in.
    pub target_schema: String,
    /// Staging bucket name.
    pub s3_bucket: String,
    /// Staging bucket region.
    pub s3_region: String,
    /// Key prefix within the staging bucket.
    pub s3_prefix: String,
    /// IAM role assumed for the COPY.
    pub iam_role: String,
    /// Access key for the staging bucket.
    pub aws_access_key_id: Secret,
    /// Secret key for the staging bucket.
    pub aws_secret_access_key: Secret,
}

/// Connection details for a Snowflake destination using a managed stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnowflakeConnection {
    /// Authentication mechanism.
    #[serde(default = "default_access_token_auth")]
    pub auth_type: String,
    /// Name of the managed stage.
    #[serde(default = "default_stage_name")]
    pub stage_name: String,
    /// Whether to create the stage before loading.
    #[serde(default = "default_true")]
    pub create_stage: bool,
    /// Whether to drop the stage after loading.
    #[serde(default = "default_true")]
    pub delete_stage: bool,
    /// Login user.
    pub user: String,
    /// Programmatic access token.
    pub access_token: Secret,
    /// Account identifier.
    pub account: String,
    /// Virtual warehouse used for the load.
    pub warehouse: String,
    /// Target database.
    pub database: String,
    /// Schema the export lands in.
    pub target_schema: String,
}

/// Connection details for a BigQuery destination staged through GCS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigQueryConnection {
    /// Authentication mechanism.
    #[serde(default = "default_service_account_auth")]
    pub auth_type: String,
    /// GCP project.
    pub project_id: String,
    /// Dataset the export lands in.
    pub target_schema: String,
    /// Staging bucket name.
    pub gcs_bucket_name: String,
    /// Path within the staging bucket.
    pub gcs_bucket_path: String,
    /// Service-account key, as a JSON blob.
    pub service_account: Secret,
}

/// Connection details for a Postgres destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresConnection {
    /// Authentication mechanism.
    #[serde(default = "default_basic_auth")]
    pub auth_type: String,
    /// Server hostname.
    pub host: String,
    /// Login user.
    pub user: String,
    /// Login password.
    pub password: Secret,
    /// Server port.
    pub port: u16,
    /// Target database.
    pub database: String,
    /// Schema the export lands in.
    pub target_schema: String,
}

/// Connection details for a destination, discriminated by vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "vendor_type")]
pub enum ConnectionInfo {
    /// Prints exported records to stdout. Used by demo environments.
    #[serde(rename = "console")]
    Console,
    /// Redshift via S3 staging.
    #[serde(rename = "redshift")]
    Redshift(RedshiftConnection),
    /// Snowflake via a managed stage.
    #[serde(rename = "snowflake")]
    Snowflake(SnowflakeConnection),
    /// BigQuery via GCS staging.
    #[serde(rename = "bigquery")]
    BigQuery(BigQueryConnection),
    /// Postgres, loaded directly.
    #[serde(rename = "postgresql")]
    Postgres(PostgresConnection),
}

impl ConnectionInfo {
    /// User-facing vendor name, as rendered by the dashboard.
    #[must_use]
    pub fn vendor_name(&self) -> &'static str {
        match self {
            Self::Console => "Console",
            Self::Redshift(_) => "Redshift",
            Self::Snowflake(_) => "Snowflake",
            Self::BigQuery(_) => "BigQuery",
            Self::Postgres(_) => "Postgres",
        }
    }

    /// Schema (or dataset) exports land in, where the vendor has one.
    #[must_use]
    pub fn target_schema(&self) -> Option<&str> {
        match self {
            Self::Console => None,
            Self::Redshift(c) => Some(&c.target_schema),
            Self::Snowflake(c) => Some(&c.target_schema),
            Self::BigQuery(c) => Some(&c.target_schema),
            Self::Postgres(c) => Some(&c.target_schema),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postgres_connection() -> ConnectionInfo {
        ConnectionInfo::Postgres(PostgresConnection {
            auth_type: default_basic_auth(),
            host: "db.internal".into(),
            user: "exporter".into(),
            password: Secret::from("hunter2"),
            port: 5432,
            database: "analytics".into(),
            target_schema: "exports".into(),
        })
    }

    #[test]
    fn vendor_names_match_dashboard_rendering() {
        assert_eq!(postgres_connection().vendor_name(), "Postgres");
        assert_eq!(ConnectionInfo::Console.vendor_name(), "Console");
    }

    #[test]
    fn serialization_is_tagged_by_vendor() {
        let json = serde_json::to_value(postgres_connection()).unwrap();
        assert_eq!(json["vendor_type"], "postgresql");
        assert_eq!(json["target_schema"], "exports");
    }

    #[test]
    fn secrets_are_redacted_in_serialized_output() {
        let json = serde_json::to_string(&postgres_connection()).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains("****"));
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let debugged = format!("{:?}", postgres_connection());
        assert!(!debugged.contains("hunter2"));
    }

    #[test]
    fn secret_exposes_raw_value_on_request() {
        let secret = Secret::new("token-123");
        assert_eq!(secret.expose(), "token-123");
        assert_eq!(secret.to_string(), "****");
    }

    #[test]
    fn deserializes_with_defaulted_fields() {
        let raw = r#"{
            "vendor_type": "snowflake",
            "user": "loader",
            "access_token": "tok",
            "account": "ab12345",
            "warehouse": "LOADING",
            "database": "EXPORTS",
            "target_schema": "PUBLIC"
        }"#;
        let conn: ConnectionInfo = serde_json::from_str(raw).unwrap();
        let ConnectionInfo::Snowflake(snowflake) = conn else {
            panic!("expected snowflake variant");
        };
        assert_eq!(snowflake.auth_type, "access_token");
        assert_eq!(snowflake.stage_name, "WHARF");
        assert!(snowflake.create_stage);
        assert_eq!(snowflake.access_token.expose(), "tok");
    }

    #[test]
    fn console_round_trips() {
        let json = serde_json::to_string(&ConnectionInfo::Console).unwrap();
        let back: ConnectionInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ConnectionInfo::Console);
        assert!(back.target_schema().is_none());
    }
}
