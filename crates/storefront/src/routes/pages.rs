//! Store page and terminal result pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::models::Product;
use crate::state::AppState;

/// Bundle display data for templates.
pub struct BundleView {
    pub id: String,
    pub title: String,
    pub uc_amount: u32,
    pub price: String,
    pub discount_price: String,
    pub discount_percent: u8,
}

impl From<&Product> for BundleView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            uc_amount: product.uc_amount,
            price: product.original().display(),
            discount_price: product.charge().display(),
            discount_percent: product.discount_percent,
        }
    }
}

/// Store page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub bundles: Vec<BundleView>,
}

/// Display the store page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> HomeTemplate {
    HomeTemplate {
        bundles: state.catalog().list().iter().map(BundleView::from).collect(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    #[serde(rename = "orderId", default)]
    order_id: Option<String>,
    /// Failure message carried on the order-failure redirect.
    #[serde(default)]
    error: Option<String>,
}

/// Successful payment terminal page.
#[derive(Template, WebTemplate)]
#[template(path = "payment/success.html")]
pub struct PaymentSuccessTemplate {
    pub order_id: String,
}

/// Display the payment success page.
#[instrument]
pub async fn payment_success(Query(query): Query<ResultQuery>) -> PaymentSuccessTemplate {
    PaymentSuccessTemplate {
        order_id: query.order_id.unwrap_or_default(),
    }
}

/// Failed payment terminal page.
#[derive(Template, WebTemplate)]
#[template(path = "payment/failed.html")]
pub struct PaymentFailedTemplate {
    pub order_id: String,
}

/// Display the payment failed page.
#[instrument]
pub async fn payment_failed(Query(query): Query<ResultQuery>) -> PaymentFailedTemplate {
    PaymentFailedTemplate {
        order_id: query.order_id.unwrap_or_default(),
    }
}

/// Order creation failure terminal page.
#[derive(Template, WebTemplate)]
#[template(path = "order/fail.html")]
pub struct OrderFailTemplate {
    pub reason: String,
}

/// Display the order failure page.
#[instrument]
pub async fn order_fail(Query(query): Query<ResultQuery>) -> OrderFailTemplate {
    OrderFailTemplate {
        reason: query
            .error
            .unwrap_or_else(|| "The order could not be created.".to_string()),
    }
}
