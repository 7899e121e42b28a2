//! The PubNub client: validate, assemble, send, decode.

use bytes::Bytes;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, warn};

use pubnub_core::{build_request, Config, Endpoint, OperationKind, RequestTarget};
use pubnub_crypto::{Cipher, LegacyCryptor};
use pubnub_transport::{Transport, TransportRequest};

use crate::access::{decode_grant, Grant, GrantResponse, Revoke};
use crate::channel_group::{
    decode_channel_group, AddChannelsToChannelGroup, ChannelGroupResponse,
    RemoveChannelsFromChannelGroup,
};
use crate::error::{Error, ResponseParsingError, Result};
use crate::history::{decode_history, History, HistoryResponse};
use crate::operation::{Operation, Response};
use crate::presence::{decode_set_state, SetState, SetStateResponse};
use crate::publish::{decode_publish, Publish, PublishResponse};

/// A client bound to one configuration and one transport.
///
/// The configuration can only be changed through `&mut self`, so credential
/// rotation never races an in-flight request.
pub struct PubNub<T: Transport> {
    config: Config,
    transport: T,
    sequence: AtomicU32,
}

impl<T: Transport> PubNub<T> {
    /// Create a client.
    pub fn new(config: Config, transport: T) -> Self {
        Self {
            config,
            transport,
            sequence: AtomicU32::new(1),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration, e.g. to rotate the auth key.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Assemble the request for an operation without sending it.
    pub fn build_request<E: Endpoint + ?Sized>(&self, endpoint: &E) -> Result<RequestTarget> {
        Ok(build_request(&self.config, endpoint)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute any operation.
    pub async fn execute(&self, operation: impl Into<Operation>) -> Result<Response> {
        match operation.into() {
            Operation::Publish(op) => self.publish(op).await.map(Response::Publish),
            Operation::History(op) => self.history(op).await.map(Response::History),
            Operation::SetState(op) => self.set_state(op).await.map(Response::SetState),
            Operation::AddChannelsToChannelGroup(op) => self
                .add_channels_to_channel_group(op)
                .await
                .map(Response::ChannelGroup),
            Operation::RemoveChannelsFromChannelGroup(op) => self
                .remove_channels_from_channel_group(op)
                .await
                .map(Response::ChannelGroup),
            Operation::Grant(op) => self.grant(op).await.map(Response::Grant),
            Operation::Revoke(op) => self.revoke(op).await.map(Response::Grant),
        }
    }

    /// Publish a message. The sequence number is assigned here unless set.
    pub async fn publish(&self, request: Publish) -> Result<PublishResponse> {
        let body = self.send(request.into()).await?;
        decoded(OperationKind::Publish, decode_publish(&body))
    }

    /// Fetch a page of history, decrypting with the configured cipher key.
    pub async fn history(&self, request: History) -> Result<HistoryResponse> {
        let body = self.send(request.into()).await?;
        let cipher = self.cipher()?;
        decoded(
            OperationKind::History,
            decode_history(&body, cipher.as_ref().map(|c| c as &dyn Cipher)),
        )
    }

    pub async fn set_state(&self, request: SetState) -> Result<SetStateResponse> {
        let body = self.send(request.into()).await?;
        decoded(OperationKind::SetState, decode_set_state(&body))
    }

    pub async fn add_channels_to_channel_group(
        &self,
        request: AddChannelsToChannelGroup,
    ) -> Result<ChannelGroupResponse> {
        let body = self.send(request.into()).await?;
        decoded(
            OperationKind::AddChannelsToChannelGroup,
            decode_channel_group(&body),
        )
    }

    pub async fn remove_channels_from_channel_group(
        &self,
        request: RemoveChannelsFromChannelGroup,
    ) -> Result<ChannelGroupResponse> {
        let body = self.send(request.into()).await?;
        decoded(
            OperationKind::RemoveChannelsFromChannelGroup,
            decode_channel_group(&body),
        )
    }

    pub async fn grant(&self, request: Grant) -> Result<GrantResponse> {
        let body = self.send(request.into()).await?;
        decoded(OperationKind::AccessManagerGrant, decode_grant(&body))
    }

    pub async fn revoke(&self, request: Revoke) -> Result<GrantResponse> {
        let body = self.send(request.into()).await?;
        decoded(OperationKind::AccessManagerRevoke, decode_grant(&body))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal
    // ─────────────────────────────────────────────────────────────────────────

    async fn send(&self, mut operation: Operation) -> Result<Bytes> {
        operation.validate(&self.config)?;

        if let Operation::Publish(publish) = &mut operation {
            publish.sequence_or(|| self.next_sequence());
        }

        let target = self.build_request(&operation)?;
        debug!(
            operation = %target.operation,
            method = %target.method,
            url = %target.url(),
            "sending request"
        );

        let response = self
            .transport
            .execute(TransportRequest::new(&target, &self.config))
            .await?;
        debug!(operation = %target.operation, status = response.status, "response received");

        if !response.is_success() {
            return Err(Error::Server {
                status: response.status,
                body: response.text(),
            });
        }

        Ok(response.body)
    }

    fn next_sequence(&self) -> u32 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    fn cipher(&self) -> Result<Option<LegacyCryptor>> {
        self.config
            .cipher_key()
            .map(|key| {
                LegacyCryptor::new(key).map(|c| c.with_random_iv(self.config.use_random_iv))
            })
            .transpose()
            .map_err(Error::from)
    }
}

#[cfg(feature = "reqwest")]
impl PubNub<pubnub_transport::ReqwestTransport> {
    /// Create a client that sends requests over HTTPS.
    pub fn with_reqwest(config: Config) -> Result<Self> {
        let transport = pubnub_transport::ReqwestTransport::new(&config)?;
        Ok(Self::new(config, transport))
    }
}

fn decoded<R>(
    operation: OperationKind,
    result: std::result::Result<R, ResponseParsingError>,
) -> Result<R> {
    result.map_err(|e| {
        warn!(%operation, error = %e, body = %e.body, "failed to decode response");
        Error::ResponseParsing(e)
    })
}
