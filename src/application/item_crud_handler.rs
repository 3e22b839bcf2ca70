/// アイテムCRUDハンドラー
///
/// Lambdaが渡す正規化済みイベント（routeKey, pathParameters, body）を
/// 4つのアイテム操作のいずれかにディスパッチし、結果または失敗を
/// レスポンスエンベロープ（statusCode, headers, body）に変換する。
///
/// エラーの分類はhandle()の一箇所でのみ行い、各操作はログ出力後に
/// エラーをそのまま伝播させる。not-foundも特別扱いせずHandlerErrorに統一する。
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, info};

use crate::domain::{Item, Route};
use crate::infrastructure::{ItemRepository, ItemRepositoryError};

/// アイテムCRUDハンドラーのエラー型
///
/// ステータスコードへの対応:
/// - UnsupportedRoute, MissingKey -> 400
/// - NotFound -> 404
/// - Internal, Repository -> 500
#[derive(Debug, Error)]
pub enum HandlerError {
    /// ルートキーが4操作のいずれにも一致しない
    #[error("Unsupported route: {0}")]
    UnsupportedRoute(String),

    /// 必須のパスパラメータまたはボディフィールドが欠落
    #[error("Missing required key: {0}")]
    MissingKey(String),

    /// 指定idのアイテムが存在しない
    #[error("Item with id {0} not found")]
    NotFound(String),

    /// 分類されないエラー（ボディのJSON不正、価格の型不正など）
    #[error("{0}")]
    Internal(String),

    /// ストア操作の失敗
    #[error(transparent)]
    Repository(#[from] ItemRepositoryError),
}

impl HandlerError {
    /// エラーに対応するHTTPステータスコード
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnsupportedRoute(_) | HandlerError::MissingKey(_) => 400,
            HandlerError::NotFound(_) => 404,
            HandlerError::Internal(_) | HandlerError::Repository(_) => 500,
        }
    }

    /// エラーレスポンスのボディを生成
    ///
    /// 400/404はエラーメッセージをそのまま返し、500は診断メッセージを
    /// detailsに格納した汎用エラーを返す。
    fn error_body(&self) -> Value {
        match self {
            HandlerError::UnsupportedRoute(_)
            | HandlerError::MissingKey(_)
            | HandlerError::NotFound(_) => json!({"error": self.to_string()}),
            HandlerError::Internal(_) | HandlerError::Repository(_) => {
                json!({"error": "An error occurred", "details": self.to_string()})
            }
        }
    }
}

/// イベントをアイテム操作にディスパッチするハンドラー
///
/// リポジトリは構築時に注入され、呼び出し間で共有可能（ステートレス）。
pub struct ItemCrudHandler<R>
where
    R: ItemRepository,
{
    /// アイテムリポジトリ
    repo: R,
}

impl<R> ItemCrudHandler<R>
where
    R: ItemRepository,
{
    /// 新しいItemCrudHandlerを作成
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// イベントを処理してレスポンスエンベロープを返す
    ///
    /// この関数は失敗しない: すべてのエラーはステータスコードと
    /// エラーボディに変換される。
    ///
    /// # 引数
    /// * `payload` - 正規化済みイベント（routeKey, pathParameters, body）
    ///
    /// # 戻り値
    /// `{"statusCode": int, "headers": {...}, "body": "<JSON文字列>"}`
    pub async fn handle(&self, payload: &Value) -> Value {
        let (status_code, body) = match self.dispatch(payload).await {
            Ok(body) => (200, body),
            Err(err) => {
                error!(error = %err, status_code = err.status_code(), "リクエスト処理失敗");
                (err.status_code(), err.error_body())
            }
        };

        Self::envelope(status_code, &body)
    }

    /// ルートキーをマッチして対応する操作を実行
    async fn dispatch(&self, payload: &Value) -> Result<Value, HandlerError> {
        let route_key = payload
            .get("routeKey")
            .and_then(Value::as_str)
            .ok_or_else(|| HandlerError::MissingKey("routeKey".to_string()))?;

        let route = Route::parse(route_key)
            .ok_or_else(|| HandlerError::UnsupportedRoute(route_key.to_string()))?;

        info!(route_key = route_key, "ルートディスパッチ");

        match route {
            Route::DeleteItem => self.delete_item(Self::path_id(payload)?).await,
            Route::GetItem => self.get_item(Self::path_id(payload)?).await,
            Route::ListItems => self.get_all_items().await,
            Route::PutItem => {
                let body = payload
                    .get("body")
                    .and_then(Value::as_str)
                    .ok_or_else(|| HandlerError::MissingKey("body".to_string()))?;
                self.put_item(body).await
            }
        }
    }

    /// アイテムを削除
    ///
    /// 存在しないidの削除も成功として扱う（冪等）。
    async fn delete_item(&self, id: &str) -> Result<Value, HandlerError> {
        if let Err(err) = self.repo.delete(id).await {
            error!(item_id = id, error = %err, "アイテム削除失敗");
            return Err(err.into());
        }

        info!(item_id = id, "アイテム削除完了");
        Ok(json!({"message": format!("Deleted item {id}")}))
    }

    /// アイテムをidで取得
    async fn get_item(&self, id: &str) -> Result<Value, HandlerError> {
        let item = match self.repo.get(id).await {
            Ok(item) => item,
            Err(err) => {
                error!(item_id = id, error = %err, "アイテム取得失敗");
                return Err(err.into());
            }
        };

        match item {
            Some(item) => Self::to_json(&item),
            None => Err(HandlerError::NotFound(id.to_string())),
        }
    }

    /// 全アイテムを取得（順序保証なし）
    async fn get_all_items(&self) -> Result<Value, HandlerError> {
        let items = match self.repo.scan_all().await {
            Ok(items) => items,
            Err(err) => {
                error!(error = %err, "アイテム一覧取得失敗");
                return Err(err.into());
            }
        };

        Self::to_json(&items)
    }

    /// ボディからアイテムを組み立てて保存（作成または完全置換）
    async fn put_item(&self, body: &str) -> Result<Value, HandlerError> {
        let request: Value = serde_json::from_str(body)
            .map_err(|e| HandlerError::Internal(format!("Malformed request body: {e}")))?;

        let id = Self::required_str(&request, "id")?;
        let name = Self::required_str(&request, "name")?;
        let price = request
            .get("price")
            .ok_or_else(|| HandlerError::MissingKey("price".to_string()))?;
        let price = Self::coerce_price(price)?;

        let item = Item::new(id.to_string(), name.to_string(), price);

        if let Err(err) = self.repo.put(&item).await {
            error!(item_id = %item.id, error = %err, "アイテム保存失敗");
            return Err(err.into());
        }

        info!(item_id = %item.id, "アイテム保存完了");
        Ok(json!({"message": format!("Put item {}", item.id)}))
    }

    /// pathParametersから必須のidを取り出す
    fn path_id(payload: &Value) -> Result<&str, HandlerError> {
        payload
            .get("pathParameters")
            .and_then(|params| params.get("id"))
            .and_then(Value::as_str)
            .ok_or_else(|| HandlerError::MissingKey("id".to_string()))
    }

    /// リクエストボディから必須の文字列フィールドを取り出す
    fn required_str<'a>(request: &'a Value, key: &str) -> Result<&'a str, HandlerError> {
        request
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| HandlerError::MissingKey(key.to_string()))
    }

    /// 価格を正確な10進数に変換
    ///
    /// JSON数値は最短の10進数文字列表現を経由して変換するため、
    /// 9.99のような値が二進浮動小数点の誤差を持ち込むことはない。
    /// 文字列の価格も受け付ける。
    fn coerce_price(value: &Value) -> Result<Decimal, HandlerError> {
        let text = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            other => {
                return Err(HandlerError::Internal(format!("Invalid price value: {other}")));
            }
        };

        Decimal::from_str(&text)
            .map_err(|e| HandlerError::Internal(format!("Invalid price value: {e}")))
    }

    /// 操作結果をJSON値にシリアライズ
    fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, HandlerError> {
        serde_json::to_value(value).map_err(|e| HandlerError::Internal(e.to_string()))
    }

    /// レスポンスエンベロープを構築
    fn envelope(status_code: u16, body: &Value) -> Value {
        json!({
            "statusCode": status_code,
            "headers": {"Content-Type": "application/json"},
            "body": body.to_string(),
        })
    }
}
