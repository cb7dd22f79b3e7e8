//! Closed registries for the `type` tags found in flow documents.
//!
//! Each family (condition tests, actions, decision types) is an enum generated
//! from a single table of `Variant => "tag"` pairs. Tags outside the table
//! deserialize into `Unknown` and serialize back verbatim, so older documents
//! that reference retired types survive a migration untouched.

/// Defines a tag enum, its tag registry, and its string (de)serialization.
macro_rules! define_tags {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
            /// A tag outside the recognized set, carried through unchanged.
            Unknown(String),
        }

        impl $name {
            /// Looks up a tag in the registry, falling back to `Unknown`.
            pub fn from_tag(tag: &str) -> Self {
                match tag {
                    $( $tag => Self::$variant, )*
                    other => Self::Unknown(other.to_string()),
                }
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $tag, )*
                    Self::Unknown(tag) => tag,
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Unknown(_))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let tag = String::deserialize(deserializer)?;
                Ok(Self::from_tag(&tag))
            }
        }
    };
}

define_tags! {
    /// The condition a rule tests its decision node's operand against.
    TestKind {
        True => "true",
        False => "false",
        And => "and",
        Or => "or",
        NotEmpty => "not_empty",
        Contains => "contains",
        ContainsAny => "contains_any",
        StartsWith => "starts",
        Number => "number",
        LessThan => "lt",
        LessThanOrEqual => "lte",
        GreaterThan => "gt",
        GreaterThanOrEqual => "gte",
        Equal => "eq",
        Between => "between",
        Date => "date",
        DateBefore => "date_before",
        DateEqual => "date_equal",
        DateAfter => "date_after",
        Phone => "phone",
        Regex => "regex",
        HasDistrict => "district",
        HasState => "state",
        InGroup => "in_group",
    }
}

impl TestKind {
    /// Tests whose `test` field is free text shown to or typed by a contact.
    pub fn has_localizable_text(&self) -> bool {
        matches!(
            self,
            TestKind::Contains | TestKind::ContainsAny | TestKind::StartsWith | TestKind::Regex
        )
    }

    /// The unconditional test used by "All Responses" branches.
    pub fn is_catch_all(&self) -> bool {
        matches!(self, TestKind::True)
    }
}

define_tags! {
    /// The effect an action performs when its action node is visited.
    ActionKind {
        Reply => "reply",
        Send => "send",
        Say => "say",
        Play => "play",
        AddGroup => "add_group",
        DeleteGroup => "del_group",
        AddLabel => "add_label",
        Email => "email",
        SetLanguage => "lang",
        SaveField => "save",
        StartFlow => "flow",
        TriggerFlow => "trigger-flow",
        SetChannel => "channel",
    }
}

impl ActionKind {
    /// Actions that carry a `msg` field.
    pub fn has_message(&self) -> bool {
        matches!(self, ActionKind::Reply | ActionKind::Send | ActionKind::Say)
    }

    /// Actions that carry a `recording` field.
    pub fn has_recording(&self) -> bool {
        matches!(self, ActionKind::Say)
    }
}

define_tags! {
    /// How a decision node obtains the value its rules are evaluated against.
    DecisionType {
        WaitMessage => "wait_message",
        WaitRecording => "wait_recording",
        WaitDigit => "wait_digit",
        WaitDigits => "wait_digits",
        Webhook => "webhook",
        FlowField => "flow_field",
        ContactField => "contact_field",
        Expression => "expression",
    }
}

/// The single-character wait mode carried by pre-v5 decision nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// `K`: a sequence of keypad digits.
    Digits,
    /// `M`: a single keypad digit, as used by voice menus.
    Digit,
    /// `R`: a voice recording.
    Recording,
    /// Any other code waits for a text message.
    Message,
}

impl ResponseType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "K" => ResponseType::Digits,
            "M" => ResponseType::Digit,
            "R" => ResponseType::Recording,
            _ => ResponseType::Message,
        }
    }
}
