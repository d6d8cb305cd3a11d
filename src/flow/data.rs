use super::catalogue::NodeType;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Typed view of a node's `data` bag.
///
/// Types that carry a required-field rule get their own variant. Everything
/// else, including payloads that fail to deserialize, lands in `Unchecked`
/// with the original fields preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    CommandTrigger(CommandTriggerData),
    CronTrigger(CronTriggerData),
    SendText(SendTextData),
    Media(MediaData),
    Location(LocationData),
    Contact(ContactData),
    CheckMembership(CheckMembershipData),
    ForLoop(ForLoopData),
    Variable(VariableData),
    State(StateData),
    CollectionInsert(CollectionInsertData),
    CollectionLoad(CollectionLoadData),
    HttpRequest(HttpRequestData),
    CustomCode(CustomCodeData),
    SendToAdmin(SendToAdminData),
    Delay(DelayData),
    Unchecked {
        node_type: Option<NodeType>,
        tag: String,
        fields: Map<String, Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandTriggerData {
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronTriggerData {
    pub schedule: String,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub target_chat_ids: Vec<Value>,
}

/// `messageText` is either plain text or an EditorJS block document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTextData {
    pub message_text: Value,
    #[serde(default)]
    pub parse_mode: Option<String>,
    #[serde(default)]
    pub keyboard: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
    Document,
}

impl MediaKind {
    fn field(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Document => "document",
        }
    }
}

/// Photo, video, audio and file nodes share one shape; only the URL key differs.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaData {
    pub kind: MediaKind,
    pub url: String,
    pub caption: Option<String>,
    pub parse_mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactData {
    pub phone_number: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckMembershipData {
    /// `@channel_username` or a numeric chat id.
    pub channel_id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForLoopData {
    pub loop_mode: String,
    #[serde(default)]
    pub data_key: Option<String>,
    #[serde(default)]
    pub item_variable: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableOperation {
    Set,
    Increment,
    Decrement,
    Append,
    Remove,
    Delete,
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableData {
    pub variable_name: String,
    pub operation: VariableOperation,
    #[serde(default)]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateData {
    pub key: String,
    #[serde(rename = "type", default)]
    pub state_type: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub context_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInsertData {
    #[serde(rename = "collection_name")]
    pub collection_name: String,
    #[serde(default)]
    pub field_mappings: Map<String, Value>,
}

/// Shared by the single-item and list loaders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionLoadData {
    pub collection: Value,
    pub context_key: String,
    #[serde(default)]
    pub filters: Vec<Value>,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequestData {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: Map<String, Value>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub response_variable: Option<String>,
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCodeData {
    pub js_code: String,
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendToAdminData {
    pub admin_chat_id: Value,
    pub message_text: Value,
}

/// Delay in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayData {
    pub delay: u64,
}

impl NodeData {
    /// Builds the typed view from a node's `type` tag and `data` bag.
    pub fn from_parts(tag: &str, fields: &Map<String, Value>) -> Self {
        let node_type = NodeType::from_tag(tag);
        let typed = node_type.and_then(|ty| Self::typed(ty, fields));
        typed.unwrap_or_else(|| NodeData::Unchecked {
            node_type,
            tag: tag.to_string(),
            fields: fields.clone(),
        })
    }

    fn typed(ty: NodeType, fields: &Map<String, Value>) -> Option<Self> {
        let data = match ty {
            NodeType::CommandTrigger => NodeData::CommandTrigger(parse(fields)?),
            NodeType::CronTrigger => NodeData::CronTrigger(parse(fields)?),
            NodeType::SendTextMessage => NodeData::SendText(parse(fields)?),
            NodeType::SendPhoto => NodeData::Media(media(MediaKind::Photo, fields)?),
            NodeType::SendVideo => NodeData::Media(media(MediaKind::Video, fields)?),
            NodeType::SendAudio => NodeData::Media(media(MediaKind::Audio, fields)?),
            NodeType::SendFile => NodeData::Media(media(MediaKind::Document, fields)?),
            NodeType::SendLocation => NodeData::Location(parse(fields)?),
            NodeType::SendContact => NodeData::Contact(parse(fields)?),
            NodeType::CheckMembership => NodeData::CheckMembership(parse(fields)?),
            NodeType::ForLoop => NodeData::ForLoop(parse(fields)?),
            NodeType::Variable => NodeData::Variable(parse(fields)?),
            NodeType::State => NodeData::State(parse(fields)?),
            NodeType::Collection => NodeData::CollectionInsert(parse(fields)?),
            NodeType::LoadCollectionItem | NodeType::LoadCollectionList => {
                NodeData::CollectionLoad(parse(fields)?)
            }
            NodeType::HttpRequest => NodeData::HttpRequest(parse(fields)?),
            NodeType::CustomCode => NodeData::CustomCode(parse(fields)?),
            NodeType::SendToAdmin => NodeData::SendToAdmin(parse(fields)?),
            NodeType::Delay => NodeData::Delay(parse(fields)?),
            _ => return None,
        };
        Some(data)
    }

    pub fn is_checked(&self) -> bool {
        !matches!(self, NodeData::Unchecked { .. })
    }
}

fn parse<T: DeserializeOwned>(fields: &Map<String, Value>) -> Option<T> {
    serde_json::from_value(Value::Object(fields.clone())).ok()
}

fn media(kind: MediaKind, fields: &Map<String, Value>) -> Option<MediaData> {
    let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);
    Some(MediaData {
        kind,
        url: text(kind.field())?,
        caption: text("caption"),
        parse_mode: text("parseMode"),
    })
}
