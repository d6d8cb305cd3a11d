use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad grouping of node types, used for prompts and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    Trigger,
    Message,
    MessageOperation,
    Interactive,
    FlowControl,
    Data,
    Integration,
}

/// Master macro defining the closed node-type catalogue and its wire tags.
macro_rules! define_node_catalogue {
    ( $( $category:ident => { $( ($variant:ident, $tag:literal) ),* $(,)? } )* ) => {
        /// Every node type the flow engine understands. Tags outside this set are defects.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum NodeType {
            $( $( #[serde(rename = $tag)] $variant, )* )*
        }

        impl NodeType {
            pub const ALL: &'static [NodeType] = &[ $( $( NodeType::$variant, )* )* ];

            /// The wire tag, e.g. `"CommandTriggerNode"`.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $( NodeType::$variant => $tag, )* )*
                }
            }

            pub fn category(self) -> NodeCategory {
                match self {
                    $( $( NodeType::$variant => NodeCategory::$category, )* )*
                }
            }

            /// Looks up a wire tag. Returns `None` for anything outside the catalogue.
            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $( $( $tag => Some(NodeType::$variant), )* )*
                    _ => None,
                }
            }
        }
    };
}

define_node_catalogue! {
    Trigger => {
        (CommandTrigger, "CommandTriggerNode"),
        (MessageTrigger, "MessageTriggerNode"),
        (CallbackQueryTrigger, "CallbackQueryTriggerNode"),
        (CallbackButtonTrigger, "CallbackButtonTriggerNode"),
        (ReplyButtonTrigger, "ReplyButtonTriggerNode"),
        (CronTrigger, "CronTriggerNode"),
    }
    Message => {
        (SendTextMessage, "SendTextMessageNode"),
        (SendPhoto, "SendPhotoNode"),
        (SendVideo, "SendVideoNode"),
        (SendAudio, "SendAudioNode"),
        (SendFile, "SendFileNode"),
        (SendAnimation, "SendAnimationNode"),
        (SendVoice, "SendVoiceNode"),
        (SendVideoNote, "SendVideoNoteNode"),
        (SendLocation, "SendLocationNode"),
        (SendContact, "SendContactNode"),
        (SendPoll, "SendPollNode"),
        (SendSticker, "SendStickerNode"),
        (SendMediaGroup, "SendMediaGroupNode"),
        (SendVenue, "SendVenueNode"),
        (SendDice, "SendDiceNode"),
    }
    MessageOperation => {
        (EditMessage, "EditMessageNode"),
        (DeleteMessage, "DeleteMessageNode"),
        (ForwardMessage, "ForwardMessageNode"),
        (CopyMessage, "CopyMessageNode"),
        (PinMessage, "PinMessageNode"),
        (UnpinMessage, "UnpinMessageNode"),
        (UnpinAllMessages, "UnpinAllMessagesNode"),
    }
    Interactive => {
        (ChatAction, "ChatActionNode"),
        (CallbackQueryAnswer, "CallbackQueryAnswerNode"),
        (CheckMembership, "CheckMembershipNode"),
    }
    FlowControl => {
        (IfCondition, "IfConditionNode"),
        (Random, "RandomNode"),
        (ForLoop, "ForLoopNode"),
        (ForLoopContinue, "ForLoopContinueNode"),
        (Pause, "PauseNode"),
    }
    Data => {
        (Variable, "VariableNode"),
        (State, "StateNode"),
        (Collection, "CollectionNode"),
        (LoadCollectionItem, "LoadCollectionItemNode"),
        (LoadCollectionList, "LoadCollectionListNode"),
        (UpdateCollection, "UpdateCollectionNode"),
        (DeleteCollection, "DeleteCollectionNode"),
    }
    Integration => {
        (HttpRequest, "HTTPRequestNode"),
        (CustomCode, "CustomCodeNode"),
        (SendToAdmin, "SendToAdminNode"),
        (Delay, "DelayNode"),
    }
}

const IF_CONDITION_HANDLES: &[&str] = &[
    "true", "false", "branch_0", "branch_1", "branch_2", "branch_3",
];
const FOR_LOOP_HANDLES: &[&str] = &["loop-body", "no-items"];
const FOR_LOOP_CONTINUE_HANDLES: &[&str] = &["loop-continue", "loop-done"];
const LOAD_ITEM_HANDLES: &[&str] = &["found", "not_found"];
const MEMBERSHIP_HANDLES: &[&str] = &["is-member", "not-member"];
const RANDOM_HANDLES: &[&str] = &[
    "option_0", "option_1", "option_2", "option_3", "option_4", "option_5", "option_6",
    "option_7", "option_8", "option_9",
];

impl NodeType {
    /// Entry points. Triggers are matched by the engine, never executed as actions.
    pub fn is_trigger(self) -> bool {
        self.category() == NodeCategory::Trigger
    }

    /// Data keys that must be present and non-empty for this type.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            NodeType::CommandTrigger => &["command"],
            NodeType::CronTrigger => &["schedule"],
            NodeType::SendTextMessage => &["messageText"],
            NodeType::SendPhoto => &["photo"],
            NodeType::SendVideo => &["video"],
            NodeType::SendAudio => &["audio"],
            NodeType::SendFile => &["document"],
            NodeType::SendLocation => &["latitude", "longitude"],
            NodeType::SendContact => &["phoneNumber", "firstName"],
            NodeType::CheckMembership => &["channelId"],
            NodeType::ForLoop => &["loopMode"],
            NodeType::Variable => &["variableName", "operation"],
            NodeType::State => &["key"],
            NodeType::Collection => &["collection_name"],
            NodeType::LoadCollectionItem | NodeType::LoadCollectionList => {
                &["collection", "contextKey"]
            }
            NodeType::HttpRequest => &["method", "url"],
            NodeType::CustomCode => &["jsCode"],
            NodeType::SendToAdmin => &["adminChatId", "messageText"],
            NodeType::Delay => &["delay"],
            _ => &[],
        }
    }

    /// The fixed `sourceHandle` vocabulary of a branching type, `None` for single-outcome types.
    pub fn handle_vocabulary(self) -> Option<&'static [&'static str]> {
        match self {
            NodeType::IfCondition => Some(IF_CONDITION_HANDLES),
            NodeType::ForLoop => Some(FOR_LOOP_HANDLES),
            NodeType::ForLoopContinue => Some(FOR_LOOP_CONTINUE_HANDLES),
            NodeType::LoadCollectionItem => Some(LOAD_ITEM_HANDLES),
            NodeType::CheckMembership => Some(MEMBERSHIP_HANDLES),
            NodeType::Random => Some(RANDOM_HANDLES),
            _ => None,
        }
    }

    /// Branching types must route at least one outcome.
    pub fn is_conditional(self) -> bool {
        self.handle_vocabulary().is_some()
    }

    pub fn triggers() -> impl Iterator<Item = NodeType> {
        Self::ALL.iter().copied().filter(|t| t.is_trigger())
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNodeType(pub String);

impl fmt::Display for UnknownNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown node type '{}'", self.0)
    }
}

impl std::error::Error for UnknownNodeType {}

impl FromStr for NodeType {
    type Err = UnknownNodeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::from_tag(s).ok_or_else(|| UnknownNodeType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_is_closed_and_round_trips_tags() {
        assert_eq!(NodeType::ALL.len(), 47);
        for ty in NodeType::ALL {
            assert_eq!(NodeType::from_tag(ty.as_str()), Some(*ty));
        }
        assert_eq!(NodeType::from_tag("TeleportNode"), None);
        assert!("HTTPRequestNode".parse::<NodeType>().is_ok());
    }

    #[test]
    fn six_trigger_types() {
        assert_eq!(NodeType::triggers().count(), 6);
        assert!(NodeType::CronTrigger.is_trigger());
        assert!(!NodeType::SendTextMessage.is_trigger());
    }

    #[test]
    fn random_accepts_ten_options() {
        let handles = NodeType::Random.handle_vocabulary().unwrap();
        assert_eq!(handles.len(), 10);
        assert!(handles.contains(&"option_9"));
        assert!(NodeType::Pause.handle_vocabulary().is_none());
    }
}
