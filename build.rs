const COMMANDS: &[&str] = &[
  "is_ready",
  "say_hello",
  "start_connection",
  "end_connection",
  "query_purchases",
  "query_product_details",
  "purchase",
  "subscribe",
  "consume_purchase",
  "acknowledge_purchase",
  "show_in_app_messages",
  "launch_price_change_confirmation_flow",
  "create_alternative_billing_only_reporting_details",
  "report_alternative_billing_only_transaction",
];

fn main() {
  tauri_plugin::Builder::new(COMMANDS)
    .android_path("android")
    .build();
}
