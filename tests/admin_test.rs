use storefront_orders::admin::{AdminError, TransitionPolicy};
use storefront_orders::backend::{BackendError, StatusFilter};
use storefront_orders::config::StorefrontConfig;
use storefront_orders::lifecycle::Storefront;
use storefront_orders::model::{
    Customer, OrderCreate, OrderItem, OrderStatus, OrderUpdate, ProductCreate, SessionUser, UserId,
};

/// Starts a storefront holding 25 orders, alternating between two customers.
async fn storefront_with_orders(config: StorefrontConfig) -> Storefront {
    let storefront = Storefront::in_memory(config);
    let store = storefront.store().expect("in-memory store");
    for (id, name) in [("u1", "Jean Dupont"), ("u2", "Marie Curie")] {
        store.register_customer(Customer {
            id: UserId::from(id),
            name: name.to_string(),
            email: None,
        });
    }
    let table = store
        .add_product(ProductCreate {
            name: "Table".to_string(),
            price: 250.0,
            stock: 100,
        })
        .await
        .expect("Failed to create product");

    let backend = storefront.backend();
    for i in 0..25 {
        let user = if i % 2 == 0 { "u1" } else { "u2" };
        backend
            .create_order(OrderCreate {
                user_id: UserId::from(user),
                items: vec![OrderItem::new(table.id.clone(), 1, table.price)],
                payment_method: None,
                details: None,
            })
            .await
            .expect("Failed to create order");
    }
    storefront
}

#[tokio::test]
async fn test_admin_paginates_updates_and_deletes() {
    let storefront = storefront_with_orders(StorefrontConfig::default()).await;
    let mut admin = storefront.admin_manager();

    // Customers cannot use the back office
    storefront.session().login(SessionUser::customer("u1", "Jean Dupont"));
    assert_eq!(admin.load().await, Err(AdminError::Unauthorized));

    storefront.session().login(SessionUser::admin("a1", "Admin"));
    admin.set_page(2).await.unwrap();
    assert_eq!(admin.orders().len(), 10);
    assert_eq!(admin.total(), 25);
    assert_eq!(admin.total_pages(), 3);

    admin.set_page(3).await.unwrap();
    assert_eq!(admin.orders().len(), 5);
    assert!(!admin.has_next());

    // Update: the loaded entry reflects the server without reloading
    let target = admin.orders()[0].id.clone();
    admin
        .update_order(target.clone(), OrderUpdate::status(OrderStatus::Shipped))
        .await
        .unwrap();
    assert_eq!(admin.orders()[0].status, OrderStatus::Shipped);
    assert_eq!(admin.orders()[1].status, OrderStatus::Pending);
    let store = storefront.store().expect("in-memory store");
    assert_eq!(store.order(target.clone()).await.unwrap().unwrap().status, OrderStatus::Shipped);

    // Delete: one entry gone, total decremented, page not backfilled
    let doomed = admin.orders()[2].id.clone();
    admin.delete_order(doomed.clone()).await.unwrap();
    assert_eq!(admin.total(), 24);
    assert_eq!(admin.orders().len(), 4);
    assert!(store.order(doomed.clone()).await.unwrap().is_none());

    let err = admin.delete_order(doomed).await.unwrap_err();
    assert!(matches!(err, AdminError::Backend(BackendError::Remote { status: 404, .. })));
    assert_eq!(admin.total(), 24);

    // Filter goes back to the first page
    admin.set_status_filter(StatusFilter::Only(OrderStatus::Shipped)).await.unwrap();
    assert_eq!(admin.page(), 1);
    assert_eq!(admin.total(), 1);
    assert_eq!(admin.orders()[0].id, target);

    drop(admin);
    storefront.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_search_stays_on_loaded_page() {
    let storefront = storefront_with_orders(StorefrontConfig::default()).await;
    storefront.session().login(SessionUser::admin("a1", "Admin"));
    let mut admin = storefront.admin_manager();
    admin.load().await.unwrap();

    admin.set_search("DUPONT");

    assert_eq!(admin.visible_orders().len(), 5);
    assert!(admin
        .visible_orders()
        .iter()
        .all(|o| o.customer_name() == Some("Jean Dupont")));
    assert_eq!(admin.total(), 25);

    drop(admin);
    storefront.shutdown().await.expect("Shutdown failed");
}

/// Two administrators edit the same order: both succeed, the last write wins,
/// and the first one's page keeps showing its own write until it reloads.
#[tokio::test]
async fn test_concurrent_edits_last_write_wins() {
    let storefront = storefront_with_orders(StorefrontConfig::default()).await;
    storefront.session().login(SessionUser::admin("a1", "Admin"));
    let mut first = storefront.admin_manager();
    let mut second = storefront.admin_manager();
    first.load().await.unwrap();
    second.load().await.unwrap();
    let id = first.orders()[0].id.clone();

    first
        .update_order(id.clone(), OrderUpdate::payment_method("card"))
        .await
        .unwrap();
    second
        .update_order(id.clone(), OrderUpdate::payment_method("cash"))
        .await
        .unwrap();

    assert_eq!(first.orders()[0].payment_method, "card");
    assert_eq!(second.orders()[0].payment_method, "cash");
    first.load().await.unwrap();
    assert_eq!(first.orders()[0].payment_method, "cash");

    drop((first, second));
    storefront.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_guarded_policy_from_config() {
    let config = StorefrontConfig {
        status_policy: TransitionPolicy::Guarded,
        page_size: 5,
        ..StorefrontConfig::default()
    };
    let storefront = storefront_with_orders(config).await;
    storefront.session().login(SessionUser::admin("a1", "Admin"));
    let mut admin = storefront.admin_manager();
    admin.load().await.unwrap();
    assert_eq!(admin.total_pages(), 5);
    let id = admin.orders()[0].id.clone();

    let err = admin
        .update_order(id.clone(), OrderUpdate::status(OrderStatus::Delivered))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        AdminError::IllegalTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Delivered
        }
    );

    for status in [OrderStatus::Processing, OrderStatus::Shipped, OrderStatus::Delivered] {
        admin.update_order(id.clone(), OrderUpdate::status(status)).await.unwrap();
    }
    assert_eq!(admin.orders()[0].status, OrderStatus::Delivered);

    let err = admin
        .update_order(id, OrderUpdate::status(OrderStatus::Cancelled))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::IllegalTransition { .. }));

    drop(admin);
    storefront.shutdown().await.expect("Shutdown failed");
}
