//! The synchronous stages of intake. Each returns `Result<_, IntakeRejection>`
//! so the actor can chain them with `and_then` and short-circuit to a drop.
//!
//! Verification sits between [`decode`] and [`destructure`] and is the only
//! stage that suspends; it lives in the actor.

use crate::codec;
use crate::intake_actor::IntakeRejection;
use crate::model::{Authenticated, LogicalAddress, Message, RoutingTuple, SignedMessage};
use crate::routing::{DeadLetter, RouteResolver, UnresolvedPolicy};
use actor_framework::Recipient;

/// Where an authenticated message ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Delivered(LogicalAddress),
    DeadLettered(LogicalAddress),
}

/// Raw bytes to candidate signed message.
pub fn decode(bytes: &[u8], max_datagram: usize) -> Result<SignedMessage, IntakeRejection> {
    codec::decode(bytes, max_datagram).map_err(|_| IntakeRejection::MalformedEncoding)
}

/// Authenticated payload to `(destination, message)`.
pub fn destructure(
    authentic: &Authenticated,
    max_datagram: usize,
) -> Result<RoutingTuple, IntakeRejection> {
    authentic
        .routing_tuple(max_datagram)
        .map_err(|_| IntakeRejection::MalformedRoutingEnvelope)
}

/// Enqueue the inner message on the local actor bound to its destination.
///
/// A binding whose actor has terminated counts as unresolved.
pub fn route(
    tuple: RoutingTuple,
    routes: &dyn RouteResolver,
    policy: UnresolvedPolicy,
    dead_letters: Option<&Recipient<DeadLetter>>,
) -> Result<Routed, IntakeRejection> {
    let (destination, message) = tuple.into_parts();
    let message = match routes.resolve_route(&destination) {
        Some(recipient) => match recipient.tell(message.clone()) {
            Ok(()) => return Ok(Routed::Delivered(destination)),
            Err(_) => message,
        },
        None => message,
    };
    unresolved(destination, message, policy, dead_letters)
}

fn unresolved(
    destination: LogicalAddress,
    message: Message,
    policy: UnresolvedPolicy,
    dead_letters: Option<&Recipient<DeadLetter>>,
) -> Result<Routed, IntakeRejection> {
    match (policy, dead_letters) {
        (UnresolvedPolicy::DeadLetter, Some(sink)) => {
            let letter = DeadLetter {
                destination: destination.clone(),
                message,
            };
            match sink.tell(letter) {
                Ok(()) => Ok(Routed::DeadLettered(destination)),
                Err(_) => Err(IntakeRejection::UnresolvedDestination(destination)),
            }
        }
        _ => Err(IntakeRejection::UnresolvedDestination(destination)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::MAX_UDP_DATAGRAM;
    use crate::routing::LocalDirectory;
    use actor_framework::FrameworkError;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn collector<M: Send + 'static>(id: &str) -> (Recipient<M>, Arc<Mutex<Vec<M>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let recipient = Recipient::from_fn(id, move |m| {
            sink.lock().push(m);
            Ok(())
        });
        (recipient, seen)
    }

    fn tuple(to: &str, text: &str) -> RoutingTuple {
        RoutingTuple::new(to.into(), Message::from(text))
    }

    #[test]
    fn test_decode_rejects_garbage_and_oversize() {
        assert_eq!(
            decode(&[0xff; 16], MAX_UDP_DATAGRAM),
            Err(IntakeRejection::MalformedEncoding)
        );
        assert_eq!(decode(&[0; 65], 64), Err(IntakeRejection::MalformedEncoding));
    }

    #[test]
    fn test_destructure_rejects_non_tuple_payload() {
        let authentic = Authenticated::new(
            crate::model::SignerId::from_bytes([0; 32]),
            b"not a tuple".to_vec(),
        );
        assert_eq!(
            destructure(&authentic, MAX_UDP_DATAGRAM),
            Err(IntakeRejection::MalformedRoutingEnvelope)
        );
    }

    #[test]
    fn test_route_delivers_to_bound_actor() {
        let directory = LocalDirectory::new();
        let (recipient, seen) = collector("actor-7");
        directory.register("actor-7", recipient);

        let routed = route(tuple("actor-7", "ping"), &directory, UnresolvedPolicy::Drop, None);
        assert_eq!(routed, Ok(Routed::Delivered("actor-7".into())));
        assert_eq!(seen.lock()[0].as_text(), Some("ping"));
    }

    #[test]
    fn test_unresolved_drop_and_dead_letter() {
        let directory = LocalDirectory::new();
        let (dead, letters) = collector::<DeadLetter>("dead-letters");

        assert_eq!(
            route(tuple("ghost", "x"), &directory, UnresolvedPolicy::Drop, Some(&dead)),
            Err(IntakeRejection::UnresolvedDestination("ghost".into()))
        );
        // Dead-letter policy without a sink still drops.
        assert_eq!(
            route(tuple("ghost", "x"), &directory, UnresolvedPolicy::DeadLetter, None),
            Err(IntakeRejection::UnresolvedDestination("ghost".into()))
        );
        assert_eq!(
            route(tuple("ghost", "x"), &directory, UnresolvedPolicy::DeadLetter, Some(&dead)),
            Ok(Routed::DeadLettered("ghost".into()))
        );
        assert_eq!(letters.lock().len(), 1);
        assert_eq!(letters.lock()[0].destination, LogicalAddress::from("ghost"));
    }

    #[test]
    fn test_terminated_target_counts_as_unresolved() {
        let directory = LocalDirectory::new();
        directory.register(
            "actor-7",
            Recipient::from_fn("actor-7", |_: Message| {
                Err(FrameworkError::ActorClosed("actor-7".into()))
            }),
        );
        assert_eq!(
            route(tuple("actor-7", "ping"), &directory, UnresolvedPolicy::Drop, None),
            Err(IntakeRejection::UnresolvedDestination("actor-7".into()))
        );
    }
}
