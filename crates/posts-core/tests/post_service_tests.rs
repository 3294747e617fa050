//! Post service behaviour: visibility, ownership, likes and comments

use std::sync::Arc;

use postgate_auth_core::{AuthError, Caller, Role};
use postgate_posts_core::{
    CommentRequest, CreatePostRequest, InMemoryPostStore, PostError, PostFilter, PostService,
    UpdatePostRequest,
};

fn caller(id: &str, role: Role) -> Caller {
    Caller {
        id: id.to_string(),
        username: format!("{}_name", id),
        email: format!("{}@example.com", id),
        role,
    }
}

fn setup() -> (PostService, InMemoryPostStore) {
    let store = InMemoryPostStore::new();
    (PostService::new(Arc::new(store.clone())), store)
}

fn new_post(title: &str, published: bool) -> CreatePostRequest {
    CreatePostRequest {
        title: title.to_string(),
        content: "Some content that is long enough".to_string(),
        excerpt: None,
        category: Some("Tech".to_string()),
        tags: vec!["Rust".to_string(), "web".to_string()],
        published,
    }
}

#[tokio::test]
async fn test_create_post() {
    let (service, store) = setup();
    let alice = caller("alice", Role::User);

    let post = service.create(&alice, new_post("Hello, World!", true)).await.unwrap();
    assert_eq!(post.slug, "hello-world");
    assert_eq!(post.author_id, "alice");
    assert_eq!(post.author_username, "alice_name");
    assert_eq!(post.category, "tech");
    assert_eq!(post.tags, vec!["rust", "web"]);
    assert_eq!(post.excerpt, "Some content that is long enough");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_slugs_are_unique() {
    let (service, _) = setup();
    let alice = caller("alice", Role::User);

    let first = service.create(&alice, new_post("Same Title", true)).await.unwrap();
    let second = service.create(&alice, new_post("Same title!", true)).await.unwrap();
    let third = service.create(&alice, new_post("same  TITLE", true)).await.unwrap();

    assert_eq!(first.slug, "same-title");
    assert_eq!(second.slug, "same-title-1");
    assert_eq!(third.slug, "same-title-2");
}

#[tokio::test]
async fn test_create_validation() {
    let (service, store) = setup();
    let alice = caller("alice", Role::User);

    let request = CreatePostRequest { title: "Hi".to_string(), ..new_post("", true) };
    assert!(matches!(service.create(&alice, request).await, Err(PostError::Validation(_))));

    let request = CreatePostRequest {
        tags: (0..11).map(|i| format!("tag{}", i)).collect(),
        ..new_post("Too many tags", true)
    };
    assert!(matches!(service.create(&alice, request).await, Err(PostError::Validation(_))));
    assert!(store.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_distinct_slugs() {
    let (service, store) = setup();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = service.clone();
            let author = caller(&format!("user{}", i), Role::User);
            tokio::spawn(async move { service.create(&author, new_post("Race Day", true)).await })
        })
        .collect();

    let mut slugs = Vec::new();
    for handle in handles {
        slugs.push(handle.await.unwrap().unwrap().slug);
    }
    slugs.sort();
    slugs.dedup();

    assert_eq!(slugs.len(), 8);
    assert!(slugs.contains(&"race-day".to_string()));
    assert!(slugs.contains(&"race-day-7".to_string()));
    assert_eq!(store.len(), 8);
}

#[tokio::test]
async fn test_blank_text_is_rejected() {
    let (service, store) = setup();
    let alice = caller("alice", Role::User);

    let request = CreatePostRequest { title: "     ".to_string(), ..new_post("", true) };
    match service.create(&alice, request).await {
        Err(PostError::Validation(errors)) => assert_eq!(errors, vec!["Title cannot be blank"]),
        other => panic!("expected validation error, got {:?}", other),
    }

    let request = CreatePostRequest { content: " ".repeat(10), ..new_post("Blank body", true) };
    match service.create(&alice, request).await {
        Err(PostError::Validation(errors)) => assert_eq!(errors, vec!["Content cannot be blank"]),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(store.is_empty());

    let post = service.create(&alice, new_post("Real post", true)).await.unwrap();
    let update = UpdatePostRequest { title: Some("\t\t\t".to_string()), ..Default::default() };
    assert!(matches!(
        service.update(&alice, &post.id, update).await,
        Err(PostError::Validation(_))
    ));

    let comment = CommentRequest { content: "   ".to_string() };
    assert!(matches!(
        service.add_comment(&alice, &post.id, comment).await,
        Err(PostError::Validation(_))
    ));
}

#[tokio::test]
async fn test_drafts_hidden_from_others() {
    let (service, _) = setup();
    let alice = caller("alice", Role::User);
    let bob = caller("bob", Role::User);
    let admin = caller("root", Role::Admin);

    service.create(&alice, new_post("Published", true)).await.unwrap();
    let draft = service.create(&alice, new_post("Draft", false)).await.unwrap();

    assert_eq!(service.list(None, PostFilter::default()).await.unwrap().total, 1);
    assert_eq!(service.list(Some(&bob), PostFilter::default()).await.unwrap().total, 1);
    assert_eq!(service.list(Some(&alice), PostFilter::default()).await.unwrap().total, 2);
    assert_eq!(service.list(Some(&admin), PostFilter::default()).await.unwrap().total, 2);

    assert!(matches!(service.get(None, &draft.id).await, Err(PostError::NotFound(_))));
    assert!(matches!(service.get(Some(&bob), &draft.id).await, Err(PostError::NotFound(_))));
    assert!(service.get(Some(&alice), &draft.id).await.is_ok());
}

#[tokio::test]
async fn test_list_filters_and_pages() {
    let (service, _) = setup();
    let alice = caller("alice", Role::User);
    let bob = caller("bob", Role::User);

    for i in 0..12 {
        let mut request = new_post(&format!("Post number {}", i), true);
        if i % 3 == 0 {
            request.category = Some("life".to_string());
            request.tags = vec!["personal".to_string()];
        }
        let author = if i < 10 { &alice } else { &bob };
        service.create(author, request).await.unwrap();
    }

    let first = service.list(None, PostFilter::default()).await.unwrap();
    assert_eq!(first.total, 12);
    assert_eq!(first.posts.len(), 10);
    assert_eq!(first.pages, 2);

    let second = service
        .list(None, PostFilter { page: Some(2), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(second.posts.len(), 2);

    let life = service
        .list(None, PostFilter { category: Some("LIFE".to_string()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(life.total, 4);

    let personal = service
        .list(None, PostFilter { tag: Some("personal".to_string()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(personal.total, 4);

    let by_bob = service
        .list(None, PostFilter { author: Some("bob".to_string()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(by_bob.total, 2);
}

#[tokio::test]
async fn test_get_counts_views() {
    let (service, _) = setup();
    let alice = caller("alice", Role::User);
    let post = service.create(&alice, new_post("Viewed", true)).await.unwrap();

    service.get(None, &post.id).await.unwrap();
    let seen = service.get(None, &post.id).await.unwrap();
    assert_eq!(seen.view_count, 2);

    assert!(matches!(service.get(None, "missing").await, Err(PostError::NotFound(_))));
}

#[tokio::test]
async fn test_update_and_delete_require_ownership() {
    let (service, store) = setup();
    let alice = caller("alice", Role::User);
    let bob = caller("bob", Role::User);
    let admin = caller("root", Role::Admin);
    let post = service.create(&alice, new_post("Owned post", true)).await.unwrap();

    let edit = UpdatePostRequest { title: Some("Edited".to_string()), ..Default::default() };
    let denied = service.update(&bob, &post.id, edit.clone()).await;
    assert!(matches!(denied, Err(PostError::Auth(AuthError::NotOwner))));

    let updated = service.update(&alice, &post.id, edit).await.unwrap();
    assert_eq!(updated.title, "Edited");
    assert_eq!(updated.slug, "owned-post");

    let by_admin = service
        .update(&admin, &post.id, UpdatePostRequest { published: Some(false), ..Default::default() })
        .await
        .unwrap();
    assert!(!by_admin.published);

    let denied = service.delete(&bob, &post.id).await;
    // Unpublished now, so bob cannot even see it.
    assert!(matches!(denied, Err(PostError::NotFound(_))));

    service.delete(&alice, &post.id).await.unwrap();
    assert!(store.is_empty());
    assert!(matches!(service.delete(&alice, &post.id).await, Err(PostError::NotFound(_))));
}

#[tokio::test]
async fn test_non_owner_cannot_delete_published_post() {
    let (service, _) = setup();
    let alice = caller("alice", Role::User);
    let bob = caller("bob", Role::User);
    let post = service.create(&alice, new_post("Keep out", true)).await.unwrap();

    let denied = service.delete(&bob, &post.id).await;
    assert!(matches!(denied, Err(PostError::Auth(AuthError::NotOwner))));

    let admin = caller("root", Role::Admin);
    service.delete(&admin, &post.id).await.unwrap();
}

#[tokio::test]
async fn test_toggle_like() {
    let (service, _) = setup();
    let alice = caller("alice", Role::User);
    let bob = caller("bob", Role::User);
    let post = service.create(&alice, new_post("Likeable", true)).await.unwrap();

    let like = service.toggle_like(&bob, &post.id).await.unwrap();
    assert!(like.liked);
    assert_eq!(like.likes, 1);

    let like = service.toggle_like(&alice, &post.id).await.unwrap();
    assert_eq!(like.likes, 2);

    let unlike = service.toggle_like(&bob, &post.id).await.unwrap();
    assert!(!unlike.liked);
    assert_eq!(unlike.likes, 1);
}

#[tokio::test]
async fn test_comments() {
    let (service, _) = setup();
    let alice = caller("alice", Role::User);
    let bob = caller("bob", Role::User);
    let carol = caller("carol", Role::User);
    let admin = caller("root", Role::Admin);
    let post = service.create(&alice, new_post("Discuss", true)).await.unwrap();

    let comment = service
        .add_comment(&bob, &post.id, CommentRequest { content: " Nice post ".to_string() })
        .await
        .unwrap();
    assert_eq!(comment.content, "Nice post");
    assert_eq!(comment.username, "bob_name");

    let blank = service
        .add_comment(&bob, &post.id, CommentRequest { content: "   ".to_string() })
        .await;
    assert!(matches!(blank, Err(PostError::Validation(_))));

    let denied = service.delete_comment(&carol, &post.id, &comment.id).await;
    assert!(matches!(denied, Err(PostError::Auth(AuthError::NotOwner))));

    service.delete_comment(&bob, &post.id, &comment.id).await.unwrap();
    let missing = service.delete_comment(&bob, &post.id, &comment.id).await;
    assert!(matches!(missing, Err(PostError::CommentNotFound(_))));

    let second = service
        .add_comment(&carol, &post.id, CommentRequest { content: "Spam".to_string() })
        .await
        .unwrap();
    service.delete_comment(&admin, &post.id, &second.id).await.unwrap();

    let post = service.get(None, &post.id).await.unwrap();
    assert!(post.comments.is_empty());
}
