//! Mirror invariant checks over sequences of directory operations.

use std::collections::BTreeSet;
use std::sync::Arc;

use directory::domain::ports::{DirectoryCommand, DirectoryQuery};
use directory::domain::{DirectoryService, ErrorCode, GroupName, UserId, UserRecord};
use directory::outbound::memory::InMemoryDirectoryRepository;
use rstest::{fixture, rstest};

struct Harness {
    repository: Arc<InMemoryDirectoryRepository>,
    service: DirectoryService<InMemoryDirectoryRepository>,
}

#[fixture]
fn harness() -> Harness {
    let repository = Arc::new(InMemoryDirectoryRepository::new());
    let service = DirectoryService::new(repository.clone());
    Harness {
        repository,
        service,
    }
}

fn record(userid: &str, groups: &[&str]) -> UserRecord {
    UserRecord::try_from_parts(
        Some(userid.to_owned()),
        Some("First".to_owned()),
        Some("Last".to_owned()),
        Some(groups.iter().map(|g| (*g).to_owned()).collect()),
    )
    .expect("complete record")
}

fn group_names(names: &[&str]) -> BTreeSet<GroupName> {
    names.iter().copied().map(GroupName::new).collect()
}

fn user_ids(ids: &[&str]) -> BTreeSet<UserId> {
    ids.iter().copied().map(UserId::new).collect()
}

async fn assert_mirrored(harness: &Harness, users: &[&str], groups: &[&str]) {
    assert!(harness.repository.is_consistent().await);
    for userid in users {
        let Ok(user) = harness.service.get_user(&UserId::new(*userid)).await else {
            continue;
        };
        for group in user.groups() {
            let members = harness
                .service
                .get_group(group)
                .await
                .expect("referenced group exists");
            assert!(members.members().contains(user.id()));
        }
    }
    for name in groups {
        let Ok(group) = harness.service.get_group(&GroupName::new(*name)).await else {
            continue;
        };
        for member in group.members() {
            let user = harness
                .service
                .get_user(member)
                .await
                .expect("referenced user exists");
            assert!(user.groups().contains(group.name()));
        }
    }
}

#[rstest]
#[tokio::test]
async fn mixed_operation_sequence_keeps_indexes_mirrored(harness: Harness) {
    let users = ["jsmith", "jdoe", "ada"];
    let groups = ["A", "B", "C", "D"];

    harness
        .service
        .create_user(record("jsmith", &["A", "B"]))
        .await
        .expect("create jsmith");
    harness
        .service
        .create_user(record("jdoe", &["A"]))
        .await
        .expect("create jdoe");
    harness
        .service
        .create_group(GroupName::new("D"))
        .await
        .expect("create D");
    assert_mirrored(&harness, &users, &groups).await;

    harness
        .service
        .update_user(&UserId::new("jsmith"), record("jsmith", &["B", "C"]))
        .await
        .expect("update jsmith");
    assert_mirrored(&harness, &users, &groups).await;

    harness
        .service
        .update_group_membership(
            &GroupName::new("D"),
            vec![UserId::new("jdoe"), UserId::new("ghost")],
        )
        .await
        .expect("update D");
    assert_mirrored(&harness, &users, &groups).await;

    harness
        .service
        .create_user(record("ada", &["D"]))
        .await
        .expect("create ada");
    harness
        .service
        .delete_group(&GroupName::new("B"))
        .await
        .expect("delete B");
    harness
        .service
        .delete_user(&UserId::new("jdoe"))
        .await
        .expect("delete jdoe");
    assert_mirrored(&harness, &users, &groups).await;

    let d = harness
        .service
        .get_group(&GroupName::new("D"))
        .await
        .expect("D survives member deletion");
    assert_eq!(d.members(), &user_ids(&["ada"]));
    let jsmith = harness
        .service
        .get_user(&UserId::new("jsmith"))
        .await
        .expect("jsmith survives group deletion");
    assert_eq!(jsmith.groups(), &group_names(&["C"]));
}

#[rstest]
#[tokio::test]
async fn failed_operations_leave_store_untouched(harness: Harness) {
    harness
        .service
        .create_user(record("jsmith", &["A"]))
        .await
        .expect("create jsmith");

    let err = harness
        .service
        .create_user(record("jsmith", &["B"]))
        .await
        .expect_err("duplicate user");
    assert_eq!(err.code(), ErrorCode::Conflict);
    let err = harness
        .service
        .update_group_membership(&GroupName::new("Z"), vec![UserId::new("jsmith")])
        .await
        .expect_err("absent group");
    assert_eq!(err.code(), ErrorCode::NotFound);

    let err = harness
        .service
        .get_group(&GroupName::new("B"))
        .await
        .expect_err("no group from rejected create");
    assert_eq!(err.code(), ErrorCode::NotFound);
    let jsmith = harness
        .service
        .get_user(&UserId::new("jsmith"))
        .await
        .expect("jsmith unchanged");
    assert_eq!(jsmith.groups(), &group_names(&["A"]));
    assert!(harness.repository.is_consistent().await);
}

#[rstest]
#[tokio::test]
async fn concurrent_writers_never_split_the_relation(harness: Harness) {
    let service = Arc::new(harness.service);
    let mut tasks = Vec::new();
    for index in 0..16 {
        let service = service.clone();
        tasks.push(tokio::spawn(async move {
            let userid = format!("user-{index}");
            let group = if index % 2 == 0 { "even" } else { "odd" };
            service
                .create_user(record(&userid, &[group, "all"]))
                .await
                .map(|_| ())
        }));
    }
    for task in tasks {
        task.await.expect("task joins").expect("create succeeds");
    }

    let all = service
        .get_group(&GroupName::new("all"))
        .await
        .expect("all exists");
    assert_eq!(all.members().len(), 16);
    assert!(harness.repository.is_consistent().await);
}
