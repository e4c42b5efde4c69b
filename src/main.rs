//! # Storefront demo
//!
//! Walks through the order lifecycle against the in-memory stores:
//! 1. A customer orders a chair (after being sent to log in first).
//! 2. The customer likes a lamp.
//! 3. An administrator ships one order and deletes another.
//!
//! With `STOREFRONT_API_URL` set, the demo only lists the first back-office page of
//! that API, read-only.
//!
//! Configuration comes from the environment, see [`storefront_orders::config`].

use storefront_orders::backend::InMemoryBackend;
use storefront_orders::config::StorefrontConfig;
use storefront_orders::draft::DraftPhase;
use storefront_orders::lifecycle::{setup_tracing, Storefront};
use storefront_orders::likes::LikeOutcome;
use storefront_orders::model::{Customer, OrderStatus, OrderUpdate, Product, ProductCreate, SessionUser, UserId};
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = StorefrontConfig::from_env()?;
    info!(page_size = config.page_size, policy = %config.status_policy, "Starting storefront demo");

    let storefront = Storefront::from_config(config)?;
    let Some(store) = storefront.store() else {
        list_remote_orders(&storefront)
            .instrument(tracing::info_span!("back_office"))
            .await
            .inspect_err(|e| error!(error = %e, "Back office failed"))?;
        storefront.shutdown().await?;
        info!("Demo completed successfully");
        return Ok(());
    };
    let catalog = seed(store).await?;

    let span = tracing::info_span!("customer");
    async {
        let mut draft = storefront.draft_controller();
        let chair = catalog[0].clone();

        // Anonymous visitors are routed to the login dialog.
        draft.select_product(chair.clone());
        storefront.session().login(SessionUser::customer("user_1", "Jean Dupont"));
        draft.select_product(chair);
        draft.set_quantity(2);

        match &draft.confirm().await.phase {
            DraftPhase::Succeeded { confirmation, .. } => info!(%confirmation, "Customer order placed"),
            other => warn!(phase = ?other, "Customer order not placed"),
        }
        for _ in 0..2 {
            draft.select_product(catalog[1].clone());
            draft.set_quantity(1);
            draft.confirm().await;
        }
    }
    .instrument(span)
    .await;

    let span = tracing::info_span!("likes");
    async {
        let likes = storefront.like_coordinator(catalog.clone())?;
        match likes.toggle(catalog[1].id.clone()).await {
            LikeOutcome::Confirmed { likes, .. } => info!(likes, "Lamp liked"),
            LikeOutcome::RolledBack { error } => warn!(%error, "Like rolled back"),
        }
        for notification in likes.take_notifications() {
            warn!(message = %notification.message, "Notification");
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("back_office");
    async {
        storefront.session().login(SessionUser::admin("admin_1", "Gérante"));
        let mut admin = storefront.admin_manager();
        admin.load().await?;
        info!(total = admin.total(), pages = admin.total_pages(), "Back office loaded");

        let Some(newest) = admin.orders().first().map(|o| o.id.clone()) else {
            return Ok(());
        };
        admin
            .update_order(newest.clone(), OrderUpdate::status(OrderStatus::Processing))
            .await?;
        admin
            .update_order(newest, OrderUpdate::status(OrderStatus::Shipped))
            .await?;

        if let Some(oldest) = admin.orders().last().map(|o| o.id.clone()) {
            admin.delete_order(oldest).await?;
        }

        admin.set_search("dupont");
        for order in admin.visible_orders() {
            info!(
                order_id = %order.id,
                customer = order.customer_name().unwrap_or("?"),
                status = %order.status,
                total = order.total_amount,
                "Order"
            );
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await
    .inspect_err(|e| error!(error = %e, "Back office failed"))?;

    storefront.shutdown().await?;
    info!("Demo completed successfully");
    Ok(())
}

/// Prints the first page of the remote back office.
async fn list_remote_orders(storefront: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    storefront.session().login(SessionUser::admin("admin", "Back office"));
    let mut admin = storefront.admin_manager();
    admin.load().await?;
    info!(total = admin.total(), pages = admin.total_pages(), "Back office loaded");
    for order in admin.orders() {
        info!(
            order_id = %order.id,
            customer = order.customer_name().unwrap_or("?"),
            status = %order.status,
            total = order.total_amount,
            "Order"
        );
    }
    Ok(())
}

async fn seed(store: &InMemoryBackend) -> Result<Vec<Product>, Box<dyn std::error::Error>> {
    store.register_customer(Customer {
        id: UserId::from("user_1"),
        name: "Jean Dupont".to_string(),
        email: Some("jean.dupont@example.com".to_string()),
    });

    let mut catalog = Vec::new();
    for (name, price, stock) in [("Chaise Louis", 1000.0, 3), ("Lampe Arc", 80.0, 10)] {
        let product = store
            .add_product(ProductCreate {
                name: name.to_string(),
                price,
                stock,
            })
            .await?;
        info!(product_id = %product.id, name, "Product created");
        catalog.push(product);
    }
    Ok(catalog)
}
