// Webhook configuration models
// Flat settings record read by the sender, the runner and the connection tester

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{HookdeskError, HookdeskResult};

/// Flat webhook settings record.
///
/// Every string defaults to `""` and every flag to `false`. Fields are not
/// required to agree with each other: an endpoint may be set while its
/// enable flag is off, which silently disables dispatch on that channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookConfig {
    pub lead_webhook_url: String,
    pub lead_webhook_enabled: bool,
    pub payment_webhook_url: String,
    pub payment_api_key: String,
    pub payment_webhook_enabled: bool,
    pub email_webhook_url: String,
    pub email_api_key: String,
    pub email_automation_enabled: bool,
    pub whatsapp_webhook_url: String,
    pub whatsapp_api_key: String,
    pub whatsapp_automation_enabled: bool,
    pub slack_webhook_url: String,
    pub slack_notifications_enabled: bool,
    pub crm_sync_webhook_url: String,
    pub crm_api_key: String,
    pub crm_sync_enabled: bool,
    pub analytics_webhook_url: String,
    pub analytics_reports_enabled: bool,
    /// Shared bearer token for channels without their own key
    pub auth_token: String,
    pub project_webhook_url: String,
}

/// Partial update for [`WebhookConfig`]. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_webhook_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_webhook_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_automation_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_automation_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_notifications_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crm_sync_webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crm_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crm_sync_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics_webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics_reports_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_webhook_url: Option<String>,
}

/// Identifies one field of [`WebhookConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigField {
    LeadWebhookUrl,
    LeadWebhookEnabled,
    PaymentWebhookUrl,
    PaymentApiKey,
    PaymentWebhookEnabled,
    EmailWebhookUrl,
    EmailApiKey,
    EmailAutomationEnabled,
    WhatsappWebhookUrl,
    WhatsappApiKey,
    WhatsappAutomationEnabled,
    SlackWebhookUrl,
    SlackNotificationsEnabled,
    CrmSyncWebhookUrl,
    CrmApiKey,
    CrmSyncEnabled,
    AnalyticsWebhookUrl,
    AnalyticsReportsEnabled,
    AuthToken,
    ProjectWebhookUrl,
}

/// Value of a single config field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Flag(bool),
    Text(String),
}

impl ConfigValue {
    /// Booleans by truthiness, strings when non-empty after trimming
    pub fn is_configured(&self) -> bool {
        match self {
            ConfigValue::Flag(value) => *value,
            ConfigValue::Text(value) => !value.trim().is_empty(),
        }
    }
}

impl ConfigField {
    pub const ALL: [ConfigField; 20] = [
        ConfigField::LeadWebhookUrl,
        ConfigField::LeadWebhookEnabled,
        ConfigField::PaymentWebhookUrl,
        ConfigField::PaymentApiKey,
        ConfigField::PaymentWebhookEnabled,
        ConfigField::EmailWebhookUrl,
        ConfigField::EmailApiKey,
        ConfigField::EmailAutomationEnabled,
        ConfigField::WhatsappWebhookUrl,
        ConfigField::WhatsappApiKey,
        ConfigField::WhatsappAutomationEnabled,
        ConfigField::SlackWebhookUrl,
        ConfigField::SlackNotificationsEnabled,
        ConfigField::CrmSyncWebhookUrl,
        ConfigField::CrmApiKey,
        ConfigField::CrmSyncEnabled,
        ConfigField::AnalyticsWebhookUrl,
        ConfigField::AnalyticsReportsEnabled,
        ConfigField::AuthToken,
        ConfigField::ProjectWebhookUrl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigField::LeadWebhookUrl => "leadWebhookUrl",
            ConfigField::LeadWebhookEnabled => "leadWebhookEnabled",
            ConfigField::PaymentWebhookUrl => "paymentWebhookUrl",
            ConfigField::PaymentApiKey => "paymentApiKey",
            ConfigField::PaymentWebhookEnabled => "paymentWebhookEnabled",
            ConfigField::EmailWebhookUrl => "emailWebhookUrl",
            ConfigField::EmailApiKey => "emailApiKey",
            ConfigField::EmailAutomationEnabled => "emailAutomationEnabled",
            ConfigField::WhatsappWebhookUrl => "whatsappWebhookUrl",
            ConfigField::WhatsappApiKey => "whatsappApiKey",
            ConfigField::WhatsappAutomationEnabled => "whatsappAutomationEnabled",
            ConfigField::SlackWebhookUrl => "slackWebhookUrl",
            ConfigField::SlackNotificationsEnabled => "slackNotificationsEnabled",
            ConfigField::CrmSyncWebhookUrl => "crmSyncWebhookUrl",
            ConfigField::CrmApiKey => "crmApiKey",
            ConfigField::CrmSyncEnabled => "crmSyncEnabled",
            ConfigField::AnalyticsWebhookUrl => "analyticsWebhookUrl",
            ConfigField::AnalyticsReportsEnabled => "analyticsReportsEnabled",
            ConfigField::AuthToken => "authToken",
            ConfigField::ProjectWebhookUrl => "projectWebhookUrl",
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            ConfigField::LeadWebhookEnabled
                | ConfigField::PaymentWebhookEnabled
                | ConfigField::EmailAutomationEnabled
                | ConfigField::WhatsappAutomationEnabled
                | ConfigField::SlackNotificationsEnabled
                | ConfigField::CrmSyncEnabled
                | ConfigField::AnalyticsReportsEnabled
        )
    }

    /// Fields holding secrets, masked when displayed
    pub fn is_secret(&self) -> bool {
        matches!(
            self,
            ConfigField::PaymentApiKey
                | ConfigField::EmailApiKey
                | ConfigField::WhatsappApiKey
                | ConfigField::CrmApiKey
                | ConfigField::AuthToken
        )
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ConfigField {
    type Err = HookdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| HookdeskError::UnknownField(s.to_string()))
    }
}

impl WebhookConfig {
    /// Read one field
    pub fn get(&self, field: ConfigField) -> ConfigValue {
        match field {
            ConfigField::LeadWebhookUrl => ConfigValue::Text(self.lead_webhook_url.clone()),
            ConfigField::LeadWebhookEnabled => ConfigValue::Flag(self.lead_webhook_enabled),
            ConfigField::PaymentWebhookUrl => ConfigValue::Text(self.payment_webhook_url.clone()),
            ConfigField::PaymentApiKey => ConfigValue::Text(self.payment_api_key.clone()),
            ConfigField::PaymentWebhookEnabled => ConfigValue::Flag(self.payment_webhook_enabled),
            ConfigField::EmailWebhookUrl => ConfigValue::Text(self.email_webhook_url.clone()),
            ConfigField::EmailApiKey => ConfigValue::Text(self.email_api_key.clone()),
            ConfigField::EmailAutomationEnabled => ConfigValue::Flag(self.email_automation_enabled),
            ConfigField::WhatsappWebhookUrl => ConfigValue::Text(self.whatsapp_webhook_url.clone()),
            ConfigField::WhatsappApiKey => ConfigValue::Text(self.whatsapp_api_key.clone()),
            ConfigField::WhatsappAutomationEnabled => {
                ConfigValue::Flag(self.whatsapp_automation_enabled)
            }
            ConfigField::SlackWebhookUrl => ConfigValue::Text(self.slack_webhook_url.clone()),
            ConfigField::SlackNotificationsEnabled => {
                ConfigValue::Flag(self.slack_notifications_enabled)
            }
            ConfigField::CrmSyncWebhookUrl => ConfigValue::Text(self.crm_sync_webhook_url.clone()),
            ConfigField::CrmApiKey => ConfigValue::Text(self.crm_api_key.clone()),
            ConfigField::CrmSyncEnabled => ConfigValue::Flag(self.crm_sync_enabled),
            ConfigField::AnalyticsWebhookUrl => {
                ConfigValue::Text(self.analytics_webhook_url.clone())
            }
            ConfigField::AnalyticsReportsEnabled => {
                ConfigValue::Flag(self.analytics_reports_enabled)
            }
            ConfigField::AuthToken => ConfigValue::Text(self.auth_token.clone()),
            ConfigField::ProjectWebhookUrl => ConfigValue::Text(self.project_webhook_url.clone()),
        }
    }

    /// Read a string field, empty for flags
    pub fn text(&self, field: ConfigField) -> String {
        match self.get(field) {
            ConfigValue::Text(value) => value,
            ConfigValue::Flag(_) => String::new(),
        }
    }

    /// Read a flag field, false for strings
    pub fn flag(&self, field: ConfigField) -> bool {
        matches!(self.get(field), ConfigValue::Flag(true))
    }

    pub fn is_field_configured(&self, field: ConfigField) -> bool {
        self.get(field).is_configured()
    }
}

impl WebhookConfigPatch {
    /// Build a single-field patch from a raw string, as typed on a command line
    pub fn from_field(field: ConfigField, raw: &str) -> HookdeskResult<Self> {
        let value = if field.is_flag() {
            let flag = match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" | "" => false,
                other => {
                    return Err(HookdeskError::InvalidFieldValue {
                        field: field.to_string(),
                        reason: format!("expected a boolean, got '{}'", other),
                    })
                }
            };
            ConfigValue::Flag(flag)
        } else {
            ConfigValue::Text(raw.to_string())
        };

        let mut patch = Self::default();
        patch.set(field, value)?;
        Ok(patch)
    }

    /// Set one field of the patch, checking the value shape
    pub fn set(&mut self, field: ConfigField, value: ConfigValue) -> HookdeskResult<()> {
        let mismatch = |expected: &str| HookdeskError::InvalidFieldValue {
            field: field.to_string(),
            reason: format!("expected {}", expected),
        };

        match (field.is_flag(), value) {
            (true, ConfigValue::Flag(flag)) => {
                let slot = match field {
                    ConfigField::LeadWebhookEnabled => &mut self.lead_webhook_enabled,
                    ConfigField::PaymentWebhookEnabled => &mut self.payment_webhook_enabled,
                    ConfigField::EmailAutomationEnabled => &mut self.email_automation_enabled,
                    ConfigField::WhatsappAutomationEnabled => {
                        &mut self.whatsapp_automation_enabled
                    }
                    ConfigField::SlackNotificationsEnabled => {
                        &mut self.slack_notifications_enabled
                    }
                    ConfigField::CrmSyncEnabled => &mut self.crm_sync_enabled,
                    ConfigField::AnalyticsReportsEnabled => &mut self.analytics_reports_enabled,
                    _ => return Err(mismatch("a string")),
                };
                *slot = Some(flag);
                Ok(())
            }
            (false, ConfigValue::Text(text)) => {
                let slot = match field {
                    ConfigField::LeadWebhookUrl => &mut self.lead_webhook_url,
                    ConfigField::PaymentWebhookUrl => &mut self.payment_webhook_url,
                    ConfigField::PaymentApiKey => &mut self.payment_api_key,
                    ConfigField::EmailWebhookUrl => &mut self.email_webhook_url,
                    ConfigField::EmailApiKey => &mut self.email_api_key,
                    ConfigField::WhatsappWebhookUrl => &mut self.whatsapp_webhook_url,
                    ConfigField::WhatsappApiKey => &mut self.whatsapp_api_key,
                    ConfigField::SlackWebhookUrl => &mut self.slack_webhook_url,
                    ConfigField::CrmSyncWebhookUrl => &mut self.crm_sync_webhook_url,
                    ConfigField::CrmApiKey => &mut self.crm_api_key,
                    ConfigField::AnalyticsWebhookUrl => &mut self.analytics_webhook_url,
                    ConfigField::AuthToken => &mut self.auth_token,
                    ConfigField::ProjectWebhookUrl => &mut self.project_webhook_url,
                    _ => return Err(mismatch("a boolean")),
                };
                *slot = Some(text);
                Ok(())
            }
            (true, ConfigValue::Text(_)) => Err(mismatch("a boolean")),
            (false, ConfigValue::Flag(_)) => Err(mismatch("a string")),
        }
    }

    /// Shallow merge into `config`. Returns the fields the patch carried.
    pub fn apply(self, config: &mut WebhookConfig) -> Vec<ConfigField> {
        let mut touched = Vec::new();

        macro_rules! merge {
            ($($name:ident => $field:expr),* $(,)?) => {
                $(
                    if let Some(value) = self.$name {
                        config.$name = value;
                        touched.push($field);
                    }
                )*
            };
        }

        merge!(
            lead_webhook_url => ConfigField::LeadWebhookUrl,
            lead_webhook_enabled => ConfigField::LeadWebhookEnabled,
            payment_webhook_url => ConfigField::PaymentWebhookUrl,
            payment_api_key => ConfigField::PaymentApiKey,
            payment_webhook_enabled => ConfigField::PaymentWebhookEnabled,
            email_webhook_url => ConfigField::EmailWebhookUrl,
            email_api_key => ConfigField::EmailApiKey,
            email_automation_enabled => ConfigField::EmailAutomationEnabled,
            whatsapp_webhook_url => ConfigField::WhatsappWebhookUrl,
            whatsapp_api_key => ConfigField::WhatsappApiKey,
            whatsapp_automation_enabled => ConfigField::WhatsappAutomationEnabled,
            slack_webhook_url => ConfigField::SlackWebhookUrl,
            slack_notifications_enabled => ConfigField::SlackNotificationsEnabled,
            crm_sync_webhook_url => ConfigField::CrmSyncWebhookUrl,
            crm_api_key => ConfigField::CrmApiKey,
            crm_sync_enabled => ConfigField::CrmSyncEnabled,
            analytics_webhook_url => ConfigField::AnalyticsWebhookUrl,
            analytics_reports_enabled => ConfigField::AnalyticsReportsEnabled,
            auth_token => ConfigField::AuthToken,
            project_webhook_url => ConfigField::ProjectWebhookUrl,
        );

        touched
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// Automation Channels
// ============================================================================

/// Group of config fields one class of workflow dispatches through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationChannel {
    Leads,
    Payments,
    Email,
    Whatsapp,
    Slack,
    CrmSync,
    Analytics,
}

impl AutomationChannel {
    pub const ALL: [AutomationChannel; 7] = [
        AutomationChannel::Leads,
        AutomationChannel::Payments,
        AutomationChannel::Email,
        AutomationChannel::Whatsapp,
        AutomationChannel::Slack,
        AutomationChannel::CrmSync,
        AutomationChannel::Analytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AutomationChannel::Leads => "leads",
            AutomationChannel::Payments => "payments",
            AutomationChannel::Email => "email",
            AutomationChannel::Whatsapp => "whatsapp",
            AutomationChannel::Slack => "slack",
            AutomationChannel::CrmSync => "crm_sync",
            AutomationChannel::Analytics => "analytics",
        }
    }

    pub fn endpoint_field(&self) -> ConfigField {
        match self {
            AutomationChannel::Leads => ConfigField::LeadWebhookUrl,
            AutomationChannel::Payments => ConfigField::PaymentWebhookUrl,
            AutomationChannel::Email => ConfigField::EmailWebhookUrl,
            AutomationChannel::Whatsapp => ConfigField::WhatsappWebhookUrl,
            AutomationChannel::Slack => ConfigField::SlackWebhookUrl,
            AutomationChannel::CrmSync => ConfigField::CrmSyncWebhookUrl,
            AutomationChannel::Analytics => ConfigField::AnalyticsWebhookUrl,
        }
    }

    /// Channel-specific key, if the channel requires one
    pub fn key_field(&self) -> Option<ConfigField> {
        match self {
            AutomationChannel::Payments => Some(ConfigField::PaymentApiKey),
            AutomationChannel::Email => Some(ConfigField::EmailApiKey),
            AutomationChannel::Whatsapp => Some(ConfigField::WhatsappApiKey),
            AutomationChannel::CrmSync => Some(ConfigField::CrmApiKey),
            AutomationChannel::Leads | AutomationChannel::Slack | AutomationChannel::Analytics => {
                None
            }
        }
    }

    pub fn enabled_field(&self) -> ConfigField {
        match self {
            AutomationChannel::Leads => ConfigField::LeadWebhookEnabled,
            AutomationChannel::Payments => ConfigField::PaymentWebhookEnabled,
            AutomationChannel::Email => ConfigField::EmailAutomationEnabled,
            AutomationChannel::Whatsapp => ConfigField::WhatsappAutomationEnabled,
            AutomationChannel::Slack => ConfigField::SlackNotificationsEnabled,
            AutomationChannel::CrmSync => ConfigField::CrmSyncEnabled,
            AutomationChannel::Analytics => ConfigField::AnalyticsReportsEnabled,
        }
    }
}

impl fmt::Display for AutomationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AutomationChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AutomationChannel::ALL
            .iter()
            .copied()
            .find(|channel| channel.as_str() == s)
            .ok_or_else(|| format!("Unknown automation channel: {}", s))
    }
}

/// Why a channel cannot dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessIssue {
    MissingEndpoint,
    MissingKey,
    Disabled,
}

impl ReadinessIssue {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadinessIssue::MissingEndpoint => "missing_endpoint",
            ReadinessIssue::MissingKey => "missing_key",
            ReadinessIssue::Disabled => "disabled",
        }
    }
}

impl fmt::Display for ReadinessIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Outcome of the readiness check for one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelReadiness {
    pub channel: AutomationChannel,
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<ReadinessIssue>,
}

// ============================================================================
// Connection Test
// ============================================================================

/// Result of a connection test POST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Error,
}

/// Full outcome of a connection test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTestResult {
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub response_time_ms: u64,
}

/// Connection test state shown next to an endpoint field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionTestState {
    #[default]
    Idle,
    Testing,
    Success,
    Error,
}
