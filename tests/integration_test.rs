use storefront_orders::backend::InMemoryBackend;
use storefront_orders::config::StorefrontConfig;
use storefront_orders::draft::{DraftPhase, Modal};
use storefront_orders::lifecycle::Storefront;
use storefront_orders::likes::{FileLikeStore, LikeOutcome, LikeStore};
use storefront_orders::model::{Customer, OrderItem, OrderStatus, Product, ProductCreate, SessionUser, UserId};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

async fn seed(store: &InMemoryBackend) -> Product {
    store.register_customer(Customer {
        id: UserId::from("u1"),
        name: "Jean Dupont".to_string(),
        email: None,
    });
    store
        .add_product(ProductCreate {
            name: "Chaise".to_string(),
            price: 1000.0,
            stock: 3,
        })
        .await
        .expect("Failed to create product")
}

/// Full customer flow with the real order and product stores.
#[tokio::test]
async fn test_customer_order_flow() {
    let storefront = Storefront::in_memory(StorefrontConfig::default());
    let store = storefront.store().expect("in-memory store").clone();
    let chair = seed(&store).await;
    let mut draft = storefront.draft_controller();

    // Anonymous: routed to login, nothing stored
    let state = draft.select_product(chair.clone());
    assert!(matches!(state.phase, DraftPhase::LoginRequired { .. }));
    draft.dismiss(Modal::Login);
    assert_eq!(draft.state().phase, DraftPhase::Idle);

    // Logged in: quantity is clamped to stock, then the order goes through
    storefront.session().login(SessionUser::customer("u1", "Jean Dupont"));
    draft.select_product(chair.clone());
    assert_eq!(draft.set_quantity(99).quantity(), 3);
    assert_eq!(draft.set_quantity(0).quantity(), 1);
    draft.set_quantity(2);

    let state = draft.confirm().await;
    let DraftPhase::Succeeded { order, .. } = &state.phase else {
        panic!("expected success, got {:?}", state.phase);
    };
    assert_eq!(order.items, vec![OrderItem::new(chair.id.clone(), 2, 1000.0)]);
    assert_eq!(order.total_amount, 2000.0);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.customer_name(), Some("Jean Dupont"));

    let stored = store.order(order.id.clone()).await.unwrap().expect("Order not found");
    assert_eq!(&stored, order);
    let remaining = store.product(chair.id.clone()).await.unwrap().expect("Product not found");
    assert_eq!(remaining.stock, 1);

    // Stale catalog: the draft allows 2, the store has 1 left
    draft.select_product(chair.clone());
    draft.set_quantity(2);
    let state = draft.confirm().await;
    assert!(matches!(state.phase, DraftPhase::Failed { quantity: 2, .. }));
    assert_eq!(
        state.message(),
        Some("Insufficient stock for Chaise: requested 2, available 1")
    );
    assert_eq!(store.product(chair.id.clone()).await.unwrap().unwrap().stock, 1);

    drop(draft);
    drop(store);
    storefront.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_likes_persist_in_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("likes.json");
    let config = StorefrontConfig {
        likes_path: Some(path.clone()),
        ..StorefrontConfig::default()
    };
    let storefront = Storefront::in_memory(config);
    let store = storefront.store().expect("in-memory store").clone();
    let chair = seed(&store).await;

    let likes = storefront.like_coordinator(vec![chair.clone()]).unwrap();
    let outcome = likes.toggle(chair.id.clone()).await;
    assert_eq!(outcome, LikeOutcome::Confirmed { liked: true, likes: 1 });
    assert!(FileLikeStore::new(&path).get(&chair.id).unwrap());

    // Unknown product: the server refuses, the liked set is restored
    let outcome = likes.toggle("product_999999".into()).await;
    assert!(matches!(outcome, LikeOutcome::RolledBack { .. }));
    assert_eq!(likes.take_notifications().len(), 1);
    let liked: Vec<_> = FileLikeStore::new(&path).load().unwrap().into_iter().collect();
    assert_eq!(liked, vec![chair.id.clone()]);

    // A new coordinator starts from the persisted set
    let reopened = storefront.like_coordinator(vec![chair.clone()]).unwrap();
    assert!(reopened.is_liked(&chair.id));
    let outcome = reopened.toggle(chair.id.clone()).await;
    assert_eq!(outcome, LikeOutcome::Confirmed { liked: false, likes: 0 });

    drop((likes, reopened, store));
    storefront.shutdown().await.expect("Shutdown failed");
}

/// Fake order API answering one request with `body`; yields the request head.
async fn fake_api(body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];
        while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8(raw).unwrap()
    });
    (url, handle)
}

/// Without an API URL the storefront runs on its own stores.
#[tokio::test]
async fn test_unset_api_url_runs_in_memory() {
    let storefront = Storefront::from_config(StorefrontConfig::default()).expect("storefront");
    assert!(storefront.store().is_some());
    storefront.shutdown().await.expect("shutdown");
}

/// With an API URL every component goes through the REST backend.
#[tokio::test]
async fn test_api_url_selects_rest_backend() {
    let (url, server) = fake_api(
        r#"{"orders": [{"_id": "o9", "userId": {"_id": "u1", "name": "Jean Dupont"},
            "items": [], "totalAmount": 80, "status": "Livrée"}], "total": 1}"#,
    )
    .await;
    let config = StorefrontConfig {
        api_url: Some(url.clone()),
        api_token: Some("secret".to_string()),
        ..StorefrontConfig::default()
    };

    let storefront = Storefront::from_config(config).expect("storefront");
    assert!(storefront.store().is_none());

    storefront.session().login(SessionUser::admin("a1", "Gérante"));
    let mut admin = storefront.admin_manager();
    admin.load().await.expect("listing");

    assert_eq!(admin.total(), 1);
    assert_eq!(admin.orders()[0].status, OrderStatus::Delivered);
    assert_eq!(admin.orders()[0].customer_name(), Some("Jean Dupont"));

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/orders?page=1&limit=10 HTTP/1.1\r\n"));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer secret"));

    drop(admin);
    storefront.shutdown().await.expect("shutdown");
}
