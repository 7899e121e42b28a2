//! The closed set of operations the client can execute.

use pubnub_core::{Config, Endpoint, HttpMethod, OperationKind, QueryParams, ValidationError};

use crate::access::{Grant, GrantResponse, Revoke};
use crate::channel_group::{
    AddChannelsToChannelGroup, ChannelGroupResponse, RemoveChannelsFromChannelGroup,
};
use crate::history::{History, HistoryResponse};
use crate::presence::{SetState, SetStateResponse};
use crate::publish::{Publish, PublishResponse};

/// Any operation, dispatched through [`Endpoint`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Publish(Publish),
    History(History),
    SetState(SetState),
    AddChannelsToChannelGroup(AddChannelsToChannelGroup),
    RemoveChannelsFromChannelGroup(RemoveChannelsFromChannelGroup),
    Grant(Grant),
    Revoke(Revoke),
}

macro_rules! dispatch {
    ($self:expr, $op:ident => $body:expr) => {
        match $self {
            Operation::Publish($op) => $body,
            Operation::History($op) => $body,
            Operation::SetState($op) => $body,
            Operation::AddChannelsToChannelGroup($op) => $body,
            Operation::RemoveChannelsFromChannelGroup($op) => $body,
            Operation::Grant($op) => $body,
            Operation::Revoke($op) => $body,
        }
    };
}

impl Endpoint for Operation {
    fn operation(&self) -> OperationKind {
        dispatch!(self, op => op.operation())
    }

    fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        dispatch!(self, op => op.validate(config))
    }

    fn build_path(&self, config: &Config) -> pubnub_core::Result<String> {
        dispatch!(self, op => op.build_path(config))
    }

    fn build_query(&self, config: &Config) -> pubnub_core::Result<QueryParams> {
        dispatch!(self, op => op.build_query(config))
    }

    fn build_body(&self, config: &Config) -> pubnub_core::Result<Vec<u8>> {
        dispatch!(self, op => op.build_body(config))
    }

    fn http_method(&self) -> HttpMethod {
        dispatch!(self, op => op.http_method())
    }
}

macro_rules! impl_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Operation {
                fn from(op: $variant) -> Self {
                    Operation::$variant(op)
                }
            }
        )*
    };
}

impl_from!(
    Publish,
    History,
    SetState,
    AddChannelsToChannelGroup,
    RemoveChannelsFromChannelGroup,
    Grant,
    Revoke
);

/// A decoded response, one variant per response shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Publish(PublishResponse),
    History(HistoryResponse),
    SetState(SetStateResponse),
    /// Add and remove channels.
    ChannelGroup(ChannelGroupResponse),
    /// Grant and revoke.
    Grant(GrantResponse),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_kind_is_reachable() {
        let operations: Vec<Operation> = vec![
            Publish::new("ch").message("hey").into(),
            History::new("ch").into(),
            SetState::new().channels(["ch"]).state(json!({})).into(),
            AddChannelsToChannelGroup::new("cg", ["ch"]).into(),
            RemoveChannelsFromChannelGroup::new("cg", ["ch"]).into(),
            Grant::new().into(),
            Revoke::new().into(),
        ];

        let kinds: Vec<OperationKind> = operations.iter().map(Endpoint::operation).collect();
        assert_eq!(kinds, OperationKind::ALL.to_vec());
    }

    #[test]
    fn test_dispatch_matches_inner() {
        let config = Config::new("sub-c", "pub-c").with_uuid("me");
        let inner = Publish::new("ch").message("hey").use_post(true);
        let op = Operation::from(inner.clone());

        assert_eq!(op.http_method(), inner.http_method());
        assert_eq!(
            op.build_path(&config).unwrap(),
            inner.build_path(&config).unwrap()
        );
        assert_eq!(
            op.build_body(&config).unwrap(),
            inner.build_body(&config).unwrap()
        );
    }
}
