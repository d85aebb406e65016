//! Integration tests for `SqliteStore` against an in-memory database.

use threads_core::{
  community::{CommunityUpdate, NewCommunity},
  page::{PageRequest, SortOrder},
  store::{CommunityQuery, SocialStore, StoreError as _, UserQuery},
  thread::NewThread,
  user::UserProfile,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn profile(id: &str, username: &str) -> UserProfile {
  UserProfile {
    user_id:  id.into(),
    username: username.into(),
    name:     format!("{username} name"),
    bio:      "bio".into(),
    image:    format!("https://img.example/{id}.png"),
  }
}

fn community(id: &str, username: &str, creator: &str) -> NewCommunity {
  NewCommunity {
    community_id: id.into(),
    name:         format!("{username} community"),
    username:     username.into(),
    image:        "https://img.example/c.png".into(),
    bio:          "about".into(),
    created_by:   creator.into(),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_creates_onboarded_user() {
  let s = store().await;

  let user = s.upsert_user(profile("u1", "Alice")).await.unwrap();
  assert_eq!(user.user_id, "u1");
  assert_eq!(user.username, "alice");
  assert!(user.onboarded);

  let fetched = s.get_user("u1").await.unwrap().unwrap();
  assert_eq!(fetched, user);
}

#[tokio::test]
async fn upsert_updates_existing_user() {
  let s = store().await;
  let first = s.upsert_user(profile("u1", "alice")).await.unwrap();

  let mut changed = profile("u1", "Alicia");
  changed.bio = "new bio".into();
  let second = s.upsert_user(changed).await.unwrap();

  assert_eq!(second.username, "alicia");
  assert_eq!(second.bio, "new bio");
  assert_eq!(second.created_at, first.created_at);
  assert_eq!(s.list_users(&UserQuery::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_username_is_unique_violation() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();

  let err = s.upsert_user(profile("u2", "ALICE")).await.unwrap_err();
  assert!(err.is_unique_violation(), "{err}");
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn get_users_skips_unknown_ids() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();
  s.upsert_user(profile("u2", "bob")).await.unwrap();

  let users = s
    .get_users(&["u1".into(), "ghost".into(), "u2".into()])
    .await
    .unwrap();
  assert_eq!(users.len(), 2);
  assert!(s.get_users(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_users_search_and_exclusion() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();
  s.upsert_user(profile("u2", "alicia")).await.unwrap();
  s.upsert_user(profile("u3", "bob")).await.unwrap();

  let page = s
    .list_users(&UserQuery {
      excluding:   Some("u2".into()),
      search_text: "ALI".into(),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(page.len(), 1);
  assert_eq!(page.items[0].user_id, "u1");
  assert!(!page.is_next);
}

#[tokio::test]
async fn list_users_empty_search_only_excludes() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();
  s.upsert_user(profile("u2", "bob")).await.unwrap();

  let page = s
    .list_users(&UserQuery {
      excluding: Some("u1".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page.items[0].user_id, "u2");
}

#[tokio::test]
async fn list_users_like_wildcards_are_literal() {
  let s = store().await;
  s.upsert_user(profile("u1", "a_b")).await.unwrap();
  s.upsert_user(profile("u2", "axb")).await.unwrap();

  let page = s
    .list_users(&UserQuery { search_text: "a_b".into(), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page.items[0].user_id, "u1");
}

#[tokio::test]
async fn list_users_sort_order() {
  let s = store().await;
  for i in 0..3 {
    s.upsert_user(profile(&format!("u{i}"), &format!("user{i}")))
      .await
      .unwrap();
  }

  let asc = s
    .list_users(&UserQuery { sort: SortOrder::Asc, ..Default::default() })
    .await
    .unwrap();
  let desc = s
    .list_users(&UserQuery { sort: SortOrder::Desc, ..Default::default() })
    .await
    .unwrap();

  let asc_ids: Vec<_> = asc.items.iter().map(|u| u.user_id.as_str()).collect();
  let desc_ids: Vec<_> = desc.items.iter().map(|u| u.user_id.as_str()).collect();
  assert_eq!(asc_ids, ["u0", "u1", "u2"]);
  assert_eq!(desc_ids, ["u2", "u1", "u0"]);
}

#[tokio::test]
async fn list_users_search_folds_non_ascii_case() {
  let s = store().await;
  s.upsert_user(UserProfile {
    name: "Émile Zola".into(),
    ..profile("u1", "zola")
  })
  .await
  .unwrap();
  s.upsert_user(profile("u2", "ÖMER")).await.unwrap();
  s.upsert_user(profile("u3", "bob")).await.unwrap();

  let emile = s
    .list_users(&UserQuery { search_text: "émile".into(), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(emile.len(), 1);
  assert_eq!(emile.items[0].user_id, "u1");

  // Stored usernames are not normalised at this layer; the fold covers both
  // sides.
  let omer = s
    .list_users(&UserQuery { search_text: "Ömer".into(), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(omer.len(), 1);
  assert_eq!(omer.items[0].user_id, "u2");
}

#[tokio::test]
async fn huge_page_number_returns_empty_page() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();
  s.insert_thread(NewThread::post("hello", "u1", None)).await.unwrap();

  let far = PageRequest::new(u32::MAX, u32::MAX);
  let users = s
    .list_users(&UserQuery { page: far, ..Default::default() })
    .await
    .unwrap();
  assert!(users.is_empty());
  assert!(!users.is_next);

  let threads = s.list_top_level(far).await.unwrap();
  assert!(threads.is_empty());
  assert!(!threads.is_next);

  let communities = s
    .list_communities(&CommunityQuery { page: far, ..Default::default() })
    .await
    .unwrap();
  assert!(communities.is_empty());
}

// ─── Threads ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_thread() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();

  let thread = s
    .insert_thread(NewThread::post("hello", "u1", None))
    .await
    .unwrap();
  assert!(thread.is_top_level());

  let fetched = s.get_thread(thread.thread_id).await.unwrap().unwrap();
  assert_eq!(fetched, thread);
}

#[tokio::test]
async fn reply_to_missing_parent_is_rejected() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();

  let missing = Uuid::new_v4();
  let err = s
    .insert_thread(NewThread::reply(missing, "hi", "u1"))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::ParentNotFound(id) if id == missing));
  assert!(err.is_missing_parent());
  assert!(!err.is_unique_violation());
  assert!(s.threads_by_author("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn thread_with_unknown_author_fails() {
  let s = store().await;
  let result = s.insert_thread(NewThread::post("hello", "ghost", None)).await;
  assert!(result.is_err());
}

#[tokio::test]
async fn list_top_level_excludes_replies_and_pages() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();

  let mut posts = Vec::new();
  for i in 0..15 {
    posts.push(
      s.insert_thread(NewThread::post(format!("post {i}"), "u1", None))
        .await
        .unwrap(),
    );
  }
  s.insert_thread(NewThread::reply(posts[0].thread_id, "reply", "u1"))
    .await
    .unwrap();

  let first = s.list_top_level(PageRequest::new(1, 10)).await.unwrap();
  assert_eq!(first.len(), 10);
  assert!(first.is_next);
  assert!(first.items.iter().all(|t| t.is_top_level()));
  // Newest first.
  assert_eq!(first.items[0].thread_id, posts[14].thread_id);

  let second = s.list_top_level(PageRequest::new(2, 10)).await.unwrap();
  assert_eq!(second.len(), 5);
  assert!(!second.is_next);
  assert_eq!(second.items[4].thread_id, posts[0].thread_id);
}

#[tokio::test]
async fn children_of_returns_direct_replies_oldest_first() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();

  let root = s.insert_thread(NewThread::post("root", "u1", None)).await.unwrap();
  let a = s
    .insert_thread(NewThread::reply(root.thread_id, "a", "u1"))
    .await
    .unwrap();
  let b = s
    .insert_thread(NewThread::reply(root.thread_id, "b", "u1"))
    .await
    .unwrap();
  s.insert_thread(NewThread::reply(a.thread_id, "nested", "u1"))
    .await
    .unwrap();

  let children = s.children_of(&[root.thread_id]).await.unwrap();
  let ids: Vec<_> = children.iter().map(|t| t.thread_id).collect();
  assert_eq!(ids, [a.thread_id, b.thread_id]);
  assert!(s.children_of(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn children_of_accepts_more_ids_than_sqlite_variables() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();
  let root = s.insert_thread(NewThread::post("root", "u1", None)).await.unwrap();
  let reply = s
    .insert_thread(NewThread::reply(root.thread_id, "reply", "u1"))
    .await
    .unwrap();

  let mut ids: Vec<Uuid> = (0..40_000).map(|_| Uuid::new_v4()).collect();
  ids.push(root.thread_id);

  let children = s.children_of(&ids).await.unwrap();
  assert_eq!(children.len(), 1);
  assert_eq!(children[0].thread_id, reply.thread_id);

  let mut user_ids: Vec<String> = (0..40_000).map(|i| format!("ghost{i}")).collect();
  user_ids.push("u1".into());
  assert_eq!(s.get_users(&user_ids).await.unwrap().len(), 1);
}

// ─── Communities ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_community_adds_creator_as_member() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();

  let c = s.insert_community(community("c1", "rustaceans", "u1")).await.unwrap();
  assert_eq!(c.created_by, "u1");
  assert!(s.is_member("c1", "u1").await.unwrap());

  let members = s.members_of("c1").await.unwrap();
  assert_eq!(members.len(), 1);
  let joined = s.communities_of("u1").await.unwrap();
  assert_eq!(joined[0].community_id, "c1");
}

#[tokio::test]
async fn insert_community_is_atomic() {
  let s = store().await;
  // Unknown creator: neither the community nor a membership may persist.
  let result = s.insert_community(community("c1", "ghosts", "ghost")).await;
  assert!(result.is_err());
  assert!(s.get_community("c1").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_membership_is_unique_violation() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();
  s.insert_community(community("c1", "rustaceans", "u1")).await.unwrap();

  let err = s.add_member("c1", "u1").await.unwrap_err();
  assert!(err.is_unique_violation());
}

#[tokio::test]
async fn add_and_remove_member() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();
  s.upsert_user(profile("u2", "bob")).await.unwrap();
  s.insert_community(community("c1", "rustaceans", "u1")).await.unwrap();

  s.add_member("c1", "u2").await.unwrap();
  assert!(s.is_member("c1", "u2").await.unwrap());

  assert!(s.remove_member("c1", "u2").await.unwrap());
  assert!(!s.is_member("c1", "u2").await.unwrap());
  assert!(s.communities_of("u2").await.unwrap().is_empty());
  assert!(!s.remove_member("c1", "u2").await.unwrap());
}

#[tokio::test]
async fn update_community_overwrites_fields() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();
  s.insert_community(community("c1", "rustaceans", "u1")).await.unwrap();

  let updated = s
    .update_community("c1", CommunityUpdate {
      name:     "Crabs".into(),
      username: "crabs".into(),
      image:    "https://img.example/crab.png".into(),
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.name, "Crabs");
  assert_eq!(updated.username, "crabs");
  assert_eq!(updated.bio, "about");

  let missing = s
    .update_community("nope", CommunityUpdate {
      name:     "x".into(),
      username: "x".into(),
      image:    "x".into(),
    })
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn list_communities_search_and_paging() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();
  for i in 0..3 {
    s.insert_community(community(&format!("c{i}"), &format!("rust{i}"), "u1"))
      .await
      .unwrap();
  }
  s.insert_community(community("other", "golang", "u1")).await.unwrap();

  let page = s
    .list_communities(&CommunityQuery {
      search_text: "Rust".into(),
      page:        PageRequest::new(1, 2),
      sort:        SortOrder::Asc,
    })
    .await
    .unwrap();
  assert_eq!(page.len(), 2);
  assert!(page.is_next);
  assert_eq!(page.items[0].community_id, "c0");
}

#[tokio::test]
async fn list_communities_search_folds_non_ascii_case() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();
  s.insert_community(NewCommunity {
    name: "Café Société".into(),
    ..community("c1", "cafe", "u1")
  })
  .await
  .unwrap();
  s.insert_community(community("c2", "tea", "u1")).await.unwrap();

  let page = s
    .list_communities(&CommunityQuery {
      search_text: "CAFÉ SOC".into(),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page.items[0].community_id, "c1");
}

#[tokio::test]
async fn delete_community_removes_threads_replies_and_memberships() {
  let s = store().await;
  s.upsert_user(profile("u1", "alice")).await.unwrap();
  s.upsert_user(profile("u2", "bob")).await.unwrap();
  s.insert_community(community("c1", "rustaceans", "u1")).await.unwrap();
  s.add_member("c1", "u2").await.unwrap();

  let post = s
    .insert_thread(NewThread::post("in community", "u1", Some("c1".into())))
    .await
    .unwrap();
  let reply = s
    .insert_thread(NewThread::reply(post.thread_id, "reply", "u2"))
    .await
    .unwrap();
  let outside = s.insert_thread(NewThread::post("outside", "u1", None)).await.unwrap();

  let deleted = s.delete_community("c1").await.unwrap().unwrap();
  assert_eq!(deleted.community_id, "c1");

  assert!(s.get_community("c1").await.unwrap().is_none());
  assert!(s.threads_in_community("c1").await.unwrap().is_empty());
  assert!(s.get_thread(post.thread_id).await.unwrap().is_none());
  assert!(s.get_thread(reply.thread_id).await.unwrap().is_none());
  assert!(s.get_thread(outside.thread_id).await.unwrap().is_some());
  assert!(s.communities_of("u1").await.unwrap().is_empty());
  assert!(s.communities_of("u2").await.unwrap().is_empty());

  assert!(s.delete_community("c1").await.unwrap().is_none());
}
