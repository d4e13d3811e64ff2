use tauri::{command, AppHandle, Runtime};

use crate::models::*;
use crate::{PlayBillingExt, Result};

#[command]
pub(crate) async fn is_ready<R: Runtime>(app: AppHandle<R>) -> Result<bool> {
    Ok(app.play_billing().is_ready())
}

#[command]
pub(crate) async fn say_hello<R: Runtime>(
    app: AppHandle<R>,
    payload: SayHelloRequest,
) -> Result<()> {
    app.play_billing().say_hello(payload.says)
}

#[command]
pub(crate) async fn start_connection<R: Runtime>(app: AppHandle<R>) -> Result<()> {
    app.play_billing().start_connection()
}

#[command]
pub(crate) async fn end_connection<R: Runtime>(app: AppHandle<R>) -> Result<()> {
    app.play_billing().end_connection()
}

#[command]
pub(crate) async fn query_purchases<R: Runtime>(
    app: AppHandle<R>,
    payload: QueryPurchasesRequest,
) -> Result<()> {
    app.play_billing().query_purchases(payload.product_type)
}

#[command]
pub(crate) async fn query_product_details<R: Runtime>(
    app: AppHandle<R>,
    payload: QueryProductDetailsRequest,
) -> Result<()> {
    app.play_billing()
        .query_product_details(payload.product_ids, payload.product_type)
}

#[command]
pub(crate) async fn purchase<R: Runtime>(
    app: AppHandle<R>,
    payload: PurchaseRequest,
) -> Result<()> {
    app.play_billing()
        .purchase(payload.product_ids, payload.is_offer_personalized)
}

#[command]
pub(crate) async fn subscribe<R: Runtime>(
    app: AppHandle<R>,
    payload: SubscribeRequest,
) -> Result<()> {
    app.play_billing().subscribe(
        payload.product_ids,
        payload.base_plan_ids,
        payload.is_offer_personalized,
    )
}

#[command]
pub(crate) async fn consume_purchase<R: Runtime>(
    app: AppHandle<R>,
    payload: ConsumePurchaseRequest,
) -> Result<()> {
    app.play_billing().consume_purchase(payload.purchase_token)
}

#[command]
pub(crate) async fn acknowledge_purchase<R: Runtime>(
    app: AppHandle<R>,
    payload: AcknowledgePurchaseRequest,
) -> Result<()> {
    app.play_billing()
        .acknowledge_purchase(payload.purchase_token)
}

#[command]
pub(crate) async fn show_in_app_messages<R: Runtime>(app: AppHandle<R>) -> Result<()> {
    app.play_billing().show_in_app_messages()
}

#[command]
pub(crate) async fn launch_price_change_confirmation_flow<R: Runtime>(
    app: AppHandle<R>,
) -> Result<()> {
    app.play_billing().launch_price_change_confirmation_flow()
}

#[command]
pub(crate) async fn create_alternative_billing_only_reporting_details<R: Runtime>(
    app: AppHandle<R>,
) -> Result<()> {
    app.play_billing()
        .create_alternative_billing_only_reporting_details()
}

#[command]
pub(crate) async fn report_alternative_billing_only_transaction<R: Runtime>(
    app: AppHandle<R>,
) -> Result<()> {
    app.play_billing()
        .report_alternative_billing_only_transaction()
}
