//! Slack-style incoming-webhook payload.
//!
//! Every empty field is omitted from the serialized JSON, so
//! `Message::default()` encodes as `{}`.

use serde::{Deserialize, Serialize};

/// Green attachment color.
pub const GOOD: &str = "#00FF00";

/// Amber attachment color.
pub const WARNING: &str = "#FFBB00";

/// Red attachment color.
pub const DANGER: &str = "#FF0000";

/// A webhook message.
///
/// # Example
///
/// ```
/// use samhook::message::{Attachment, Field, Message, GOOD};
///
/// let mut msg = Message::text("Deploy finished");
/// msg.add_attachment(Attachment {
///     color: GOOD.to_string(),
///     title: "api-server".to_string(),
///     fields: vec![Field::short("Version", "1.4.2")],
///     ..Attachment::default()
/// });
///
/// let json = serde_json::to_string(&msg).unwrap();
/// assert!(json.contains(r#""short":true"#));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Main message text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// Display name overriding the webhook's default
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,

    /// Avatar image URL
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon_url: String,

    /// Avatar emoji, e.g. `:robot_face:`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon_emoji: String,

    /// Channel override, e.g. `#general`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,

    /// Rich attachments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Creates a message with only `text` set.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Appends one attachment.
    pub fn add_attachment(&mut self, attachment: Attachment) -> &mut Self {
        self.attachments.push(attachment);
        self
    }

    /// Appends several attachments, preserving order.
    pub fn add_attachments(
        &mut self,
        attachments: impl IntoIterator<Item = Attachment>,
    ) -> &mut Self {
        self.attachments.extend(attachments);
        self
    }
}

/// A message attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Plain-text summary for clients that cannot render attachments
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fallback: String,

    /// Sidebar color, see [`GOOD`], [`WARNING`], [`DANGER`]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,

    /// Text shown above the attachment block
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pretext: String,

    /// Small author line at the top of the attachment
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_name: String,

    /// Link applied to `author_name`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_link: String,

    /// Icon shown left of `author_name`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_icon: String,

    /// Bold heading of the attachment
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Link applied to `title`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title_link: String,

    /// Main attachment body
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// Table cells rendered below the text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,

    /// Full-width image shown below the fields
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_url: String,

    /// Thumbnail shown at the right of the attachment
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thumb_url: String,

    /// Small text at the bottom of the attachment
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub footer: String,

    /// Icon shown left of `footer`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub footer_icon: String,

    /// Unix timestamp shown next to the footer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

/// A title/value pair rendered as a table cell inside an attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Cell heading
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Cell content
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,

    /// Whether the field is narrow enough to sit beside another one
    #[serde(default, skip_serializing_if = "is_false")]
    pub short: bool,
}

impl Field {
    /// Creates a full-width field.
    #[must_use]
    pub fn long(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: false,
        }
    }

    /// Creates a half-width field.
    #[must_use]
    pub fn short(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: true,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde passes fields by reference
const fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
