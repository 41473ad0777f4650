//! Plan membership
//!
//! Every command, read and subscription on a plan goes through
//! [`require_participant`] before anything else happens.
//!
//! Joining is a request: the user is recorded as pending until the plan
//! owner approves or denies it. Only the owner may delete the plan.

use axum::http::StatusCode;

use crate::backend::error::BackendError;
use crate::backend::realtime::PlanChannels;
use crate::shared::itinerary::{ParticipantStatus, PlanId, UserId};
use crate::shared::RealtimeEvent;

use super::result::MutationError;
use super::service::ItineraryService;

/// Succeed only when `user` is an approved participant of `plan`
///
/// Unknown plans are reported as not found; pending or absent membership as
/// forbidden.
pub async fn require_participant(
    service: &ItineraryService,
    plan: PlanId,
    user: UserId,
) -> Result<(), BackendError> {
    let store = service.store();
    let status = store
        .participant_status(plan, user)
        .await
        .map_err(MutationError::from)?;

    match status {
        Some(ParticipantStatus::Approved) => Ok(()),
        Some(ParticipantStatus::Pending) => {
            tracing::info!(%plan, %user, "[Membership] participation still pending");
            Err(BackendError::forbidden("your request to join this plan is still pending"))
        }
        None => {
            if !store.plan_exists(plan).await.map_err(MutationError::from)? {
                return Err(MutationError::not_found(plan).into());
            }
            tracing::warn!(%plan, %user, "[Membership] not a participant");
            Err(BackendError::forbidden("you are not a participant of this plan"))
        }
    }
}

/// Ask to join `plan`; an approved participant stays approved
pub async fn join_plan(
    service: &ItineraryService,
    plan: PlanId,
    user: UserId,
) -> Result<ParticipantStatus, BackendError> {
    let store = service.store();
    if !store.plan_exists(plan).await.map_err(MutationError::from)? {
        return Err(MutationError::not_found(plan).into());
    }
    match store.participant_status(plan, user).await.map_err(MutationError::from)? {
        Some(status) => Ok(status),
        None => {
            store
                .add_participant(plan, user, ParticipantStatus::Pending)
                .await
                .map_err(MutationError::from)?;
            tracing::info!(%plan, %user, "[Membership] join requested");
            Ok(ParticipantStatus::Pending)
        }
    }
}

/// Owner accepts a pending join request
pub async fn approve_participant(
    service: &ItineraryService,
    plan: PlanId,
    owner: UserId,
    applicant: UserId,
) -> Result<(), BackendError> {
    require_owner(service, plan, owner, "only the plan owner can manage participants").await?;
    pending_request(service, plan, applicant).await?;
    service
        .store()
        .add_participant(plan, applicant, ParticipantStatus::Approved)
        .await
        .map_err(MutationError::from)?;
    tracing::info!(%plan, %applicant, "[Membership] participant approved");
    Ok(())
}

/// Owner rejects a pending join request
pub async fn deny_participant(
    service: &ItineraryService,
    plan: PlanId,
    owner: UserId,
    applicant: UserId,
) -> Result<(), BackendError> {
    require_owner(service, plan, owner, "only the plan owner can manage participants").await?;
    pending_request(service, plan, applicant).await?;
    service
        .store()
        .remove_participant(plan, applicant)
        .await
        .map_err(MutationError::from)?;
    tracing::info!(%plan, %applicant, "[Membership] join request denied");
    Ok(())
}

/// Owner deletes the plan
///
/// The final `plan` event is published before the channel closes, so open
/// subscriptions see it and then end.
pub async fn delete_owned_plan(
    service: &ItineraryService,
    channels: &PlanChannels,
    plan: PlanId,
    owner: UserId,
) -> Result<RealtimeEvent, BackendError> {
    require_owner(service, plan, owner, "only the plan owner can delete it").await?;
    let change = service.delete_plan(plan).await?;

    let event = RealtimeEvent::plan(plan, change).with_sender(owner);
    channels.publish(event.clone());
    channels.close(plan);
    Ok(event)
}

async fn require_owner(
    service: &ItineraryService,
    plan: PlanId,
    user: UserId,
    refusal: &str,
) -> Result<(), BackendError> {
    match service.store().plan_owner(plan).await.map_err(MutationError::from)? {
        Some(owner) if owner == user => Ok(()),
        Some(_) => Err(BackendError::forbidden(refusal)),
        None => Err(MutationError::not_found(plan).into()),
    }
}

async fn pending_request(service: &ItineraryService, plan: PlanId, applicant: UserId) -> Result<(), BackendError> {
    match service
        .store()
        .participant_status(plan, applicant)
        .await
        .map_err(MutationError::from)?
    {
        Some(ParticipantStatus::Pending) => Ok(()),
        Some(ParticipantStatus::Approved) => Err(BackendError::handler(
            StatusCode::CONFLICT,
            format!("{applicant} already participates in this plan"),
        )),
        None => Err(MutationError::not_found(format!("join request of {applicant}")).into()),
    }
}
