/// アイテムCRUD API Lambdaエントリポイント
///
/// API Gateway HTTP API経由の正規化済みイベントを処理し、
/// ルートキーに応じたアイテム操作の結果をレスポンスエンベロープで返却する。
use items_api::application::ItemCrudHandler;
use items_api::infrastructure::{
    DynamoDbConfig, DynamoDbConfigError, DynamoItemRepository, init_logging,
};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::{Value, json};
use tokio::sync::OnceCell;
use tracing::{error, info};

/// DynamoDB設定の静的インスタンス
///
/// Lambda warm start時にクライアントを再利用するため、
/// 一度初期化した設定をプロセス全体で保持する。
static DYNAMODB_CONFIG: OnceCell<DynamoDbConfig> = OnceCell::const_new();

/// DynamoDB設定を取得（初期化されていなければ初期化）
async fn get_config() -> Result<&'static DynamoDbConfig, DynamoDbConfigError> {
    DYNAMODB_CONFIG
        .get_or_try_init(|| async { DynamoDbConfig::from_env().await })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // Lambda関数を初期化して実行
    let func = service_fn(handler);
    lambda_runtime::run(func).await?;
    Ok(())
}

/// Lambda関数のメインハンドラー
///
/// # 処理フロー
/// 1. DynamoDB設定を取得（プロセス内でキャッシュ）
/// 2. リポジトリとハンドラーを組み立て
/// 3. イベントをディスパッチしてレスポンスエンベロープを返却
async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    // ルートキーを取得（ログ用）
    let route_key = event
        .payload
        .get("routeKey")
        .and_then(Value::as_str)
        .unwrap_or("unknown");

    // アクセスログ出力
    info!(
        request_id = %event.context.request_id,
        route_key = route_key,
        "リクエスト受信"
    );

    // DynamoDB設定を取得（初回のみ環境から読み込み）
    let config = match get_config().await {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "DynamoDB設定読み込み失敗");
            return Ok(json!({
                "statusCode": 500,
                "headers": {"Content-Type": "application/json"},
                "body": json!({
                    "error": "An error occurred",
                    "details": err.to_string(),
                }).to_string(),
            }));
        }
    };

    // リポジトリを作成
    let repo = DynamoItemRepository::new(
        config.client().clone(),
        config.items_table().to_string(),
    );

    // ハンドラーを作成してイベントを処理
    let crud_handler = ItemCrudHandler::new(repo);
    Ok(crud_handler.handle(&event.payload).await)
}
