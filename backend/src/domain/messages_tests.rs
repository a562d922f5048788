use std::sync::Arc;

use mockall::predicate::eq;

use super::*;
use crate::domain::ports::{
    MockApplicationRepository, MockMessageRepository, MockProjectRepository, MockUserRepository,
};
use crate::domain::test_support::{fixture_instant, fixture_clock, open_project_for, user_with_role};
use crate::domain::{ErrorCode, UserRole};

fn service(
    messages: MockMessageRepository,
    projects: MockProjectRepository,
    applications: MockApplicationRepository,
    users: MockUserRepository,
) -> MessageService {
    MessageService::new(
        Arc::new(messages),
        Arc::new(projects),
        Arc::new(applications),
        Arc::new(users),
        fixture_clock(),
    )
}

fn users_resolving(user: &User) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    let stored = user.clone();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(stored.clone())));
    users
}

fn projects_serving(project: &Project) -> MockProjectRepository {
    let mut projects = MockProjectRepository::new();
    let stored = project.clone();
    projects
        .expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    projects
}

fn message_on(project: &Project, sender: &User, content: &str) -> Message {
    Message::new(
        MessageId::random(),
        project.id(),
        sender.id(),
        content.to_owned(),
        None,
        fixture_instant(),
    )
    .expect("valid fixture message")
}

fn messages_serving(message: &Message) -> MockMessageRepository {
    let mut messages = MockMessageRepository::new();
    let stored = message.clone();
    messages
        .expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    messages
}

fn draft(content: &str) -> MessageDraft {
    MessageDraft {
        content: content.to_owned(),
        attachments: None,
    }
}

#[tokio::test]
async fn participants_exchange_messages() {
    let creator = user_with_role("creator@example.com", UserRole::Creator);
    let applicant = user_with_role("fin@example.com", UserRole::Finisher);
    let project = open_project_for(&creator);

    let mut applications = MockApplicationRepository::new();
    applications
        .expect_exists_by_project_and_finisher()
        .with(eq(project.id()), eq(applicant.id()))
        .return_once(|_, _| Ok(true));

    let mut messages = MockMessageRepository::new();
    messages
        .expect_save()
        .withf(|message: &Message| message.content() == "When can you start?")
        .times(1)
        .return_once(|_| Ok(()));

    let sent = service(messages, projects_serving(&project), applications, users_resolving(&applicant))
        .send(project.id(), applicant.email(), draft("When can you start?"))
        .await
        .expect("participant may post");
    assert_eq!(sent.sender_id(), applicant.id());
}

#[tokio::test]
async fn strangers_cannot_post_messages() {
    let creator = user_with_role("creator@example.com", UserRole::Creator);
    let stranger = user_with_role("stranger@example.com", UserRole::Both);
    let project = open_project_for(&creator);

    let mut applications = MockApplicationRepository::new();
    applications
        .expect_exists_by_project_and_finisher()
        .return_once(|_, _| Ok(false));

    let mut messages = MockMessageRepository::new();
    messages.expect_save().times(0);

    let err = service(messages, projects_serving(&project), applications, users_resolving(&stranger))
        .send(project.id(), stranger.email(), draft("hello"))
        .await
        .expect_err("stranger rejected");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), "Not allowed to message on this project");
}

#[tokio::test]
async fn strangers_cannot_read_the_thread() {
    let creator = user_with_role("creator@example.com", UserRole::Creator);
    let stranger = user_with_role("stranger@example.com", UserRole::Both);
    let project = open_project_for(&creator);

    let mut applications = MockApplicationRepository::new();
    applications
        .expect_exists_by_project_and_finisher()
        .return_once(|_, _| Ok(false));

    let mut messages = MockMessageRepository::new();
    messages.expect_list_by_project().times(0);

    let err = service(messages, projects_serving(&project), applications, users_resolving(&stranger))
        .list_by_project(project.id(), stranger.email())
        .await
        .expect_err("stranger rejected");
    assert_eq!(err.message(), "Not allowed to view messages for this project");
}

#[tokio::test]
async fn only_the_sender_edits_a_message() {
    let creator = user_with_role("creator@example.com", UserRole::Creator);
    let applicant = user_with_role("fin@example.com", UserRole::Finisher);
    let project = open_project_for(&creator);
    let message = message_on(&project, &applicant, "original");

    let mut messages = messages_serving(&message);
    messages.expect_save().times(0);

    let patch = MessagePatch {
        content: Some("edited".to_owned()),
        attachments: None,
    };
    let err = service(
        messages,
        MockProjectRepository::new(),
        MockApplicationRepository::new(),
        users_resolving(&creator),
    )
    .update(project.id(), message.id(), creator.email(), patch)
    .await
    .expect_err("creator editing someone else's words");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), "Only the sender can update the message");
}

#[tokio::test]
async fn the_creator_may_delete_any_message_on_their_project() {
    let creator = user_with_role("creator@example.com", UserRole::Creator);
    let applicant = user_with_role("fin@example.com", UserRole::Finisher);
    let project = open_project_for(&creator);
    let message = message_on(&project, &applicant, "spam");

    let mut messages = messages_serving(&message);
    messages
        .expect_delete()
        .with(eq(message.id()))
        .times(1)
        .return_once(|_| Ok(()));

    service(
        messages,
        projects_serving(&project),
        MockApplicationRepository::new(),
        users_resolving(&creator),
    )
    .delete(project.id(), message.id(), creator.email())
    .await
    .expect("creator moderates the thread");
}

#[tokio::test]
async fn bystanders_cannot_delete_messages() {
    let creator = user_with_role("creator@example.com", UserRole::Creator);
    let applicant = user_with_role("fin@example.com", UserRole::Finisher);
    let bystander = user_with_role("bystander@example.com", UserRole::Both);
    let project = open_project_for(&creator);
    let message = message_on(&project, &applicant, "hello");

    let mut messages = messages_serving(&message);
    messages.expect_delete().times(0);

    let err = service(
        messages,
        projects_serving(&project),
        MockApplicationRepository::new(),
        users_resolving(&bystander),
    )
    .delete(project.id(), message.id(), bystander.email())
    .await
    .expect_err("bystander rejected");
    assert_eq!(err.message(), "Not allowed to delete this message");
}

#[tokio::test]
async fn messages_are_pinned_to_their_project() {
    let creator = user_with_role("creator@example.com", UserRole::Creator);
    let applicant = user_with_role("fin@example.com", UserRole::Finisher);
    let home = open_project_for(&creator);
    let elsewhere = open_project_for(&creator);
    let message = message_on(&home, &applicant, "hello");

    let err = service(
        messages_serving(&message),
        projects_serving(&elsewhere),
        MockApplicationRepository::new(),
        users_resolving(&creator),
    )
    .get(elsewhere.id(), message.id(), creator.email())
    .await
    .expect_err("cross-project identifier");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Message does not belong to this project");
}
