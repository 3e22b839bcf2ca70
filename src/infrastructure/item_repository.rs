/// DynamoDBでアイテムを管理するためのリポジトリ
///
/// キーバリュー型の4操作（get / put / delete / scan_all）を抽象化し、
/// DynamoDB実装とテスト用モックの差し替えを可能にする。
use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::types::AttributeValue;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::Item;

/// アイテムリポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ItemRepositoryError {
    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),

    /// DynamoDBからの読み取りに失敗
    #[error("Read error: {0}")]
    ReadError(String),

    /// 属性マップとアイテムの相互変換に失敗
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// アイテム永続化用トレイト
///
/// 異なる実装を可能にします（実際のDynamoDB、テスト用モック）。
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// アイテムをidで取得
    ///
    /// # 戻り値
    /// * 見つかった場合は`Ok(Some(Item))`
    /// * 見つからなかった場合は`Ok(None)`
    /// * 失敗時は`Err(ItemRepositoryError)`
    async fn get(&self, id: &str) -> Result<Option<Item>, ItemRepositoryError>;

    /// アイテムを保存（同一idの既存アイテムは完全に置き換える）
    async fn put(&self, item: &Item) -> Result<(), ItemRepositoryError>;

    /// アイテムをidで削除
    ///
    /// 存在しないidの削除もエラーにしない（冪等）。
    async fn delete(&self, id: &str) -> Result<(), ItemRepositoryError>;

    /// 全アイテムを取得（順序保証なし、ページネーションなし）
    async fn scan_all(&self) -> Result<Vec<Item>, ItemRepositoryError>;
}

/// ItemRepositoryのDynamoDB実装
///
/// アイテムを属性マップ（id: S, name: S, price: N）として保存する。
/// priceはDecimalの正確な10進数文字列をそのままN属性に書き込むため、
/// 保存経路に浮動小数点は介在しない。
#[derive(Debug, Clone)]
pub struct DynamoItemRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// アイテムテーブル名
    table_name: String,
}

impl DynamoItemRepository {
    /// 新しいDynamoItemRepositoryを作成
    ///
    /// # 引数
    /// * `client` - DynamoDBクライアント
    /// * `table_name` - アイテムテーブルの名前
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// アイテムをDynamoDB属性マップに変換
    fn build_item_attributes(item: &Item) -> HashMap<String, AttributeValue> {
        let mut attributes = HashMap::new();
        attributes.insert("id".to_string(), AttributeValue::S(item.id.clone()));
        attributes.insert("name".to_string(), AttributeValue::S(item.name.clone()));
        // N属性は文字列表現のため、Decimalの正確な値がそのまま保存される
        attributes.insert(
            "price".to_string(),
            AttributeValue::N(item.price.to_string()),
        );
        attributes
    }

    /// DynamoDB属性マップからアイテムを復元
    fn item_from_attributes(
        attributes: &HashMap<String, AttributeValue>,
    ) -> Result<Item, ItemRepositoryError> {
        let id = attributes
            .get("id")
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| {
                ItemRepositoryError::SerializationError("Missing id attribute".to_string())
            })?;

        let name = attributes
            .get("name")
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| {
                ItemRepositoryError::SerializationError("Missing name attribute".to_string())
            })?;

        let price = attributes
            .get("price")
            .and_then(|v| v.as_n().ok())
            .ok_or_else(|| {
                ItemRepositoryError::SerializationError("Missing price attribute".to_string())
            })?;

        let price = Decimal::from_str(price).map_err(|e| {
            ItemRepositoryError::SerializationError(format!("Invalid price attribute: {e}"))
        })?;

        Ok(Item::new(id.clone(), name.clone(), price))
    }
}

#[async_trait]
impl ItemRepository for DynamoItemRepository {
    async fn get(&self, id: &str) -> Result<Option<Item>, ItemRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| ItemRepositoryError::ReadError(e.into_service_error().to_string()))?;

        match result.item {
            Some(attributes) => Ok(Some(Self::item_from_attributes(&attributes)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        // 条件式なしのput_item: 同一idの既存アイテムは完全に置き換えられる
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(Self::build_item_attributes(item)))
            .send()
            .await
            .map_err(|e| ItemRepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), ItemRepositoryError> {
        // delete_itemは対象が存在しなくても成功する（冪等）
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| ItemRepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut items = Vec::new();
        let mut last_evaluated_key = None;

        // ページネーション: LastEvaluatedKeyがある限りスキャンを続ける
        loop {
            let mut scan_builder = self.client.scan().table_name(&self.table_name);

            // 前回のスキャンの続きから開始
            if let Some(key) = last_evaluated_key.take() {
                scan_builder = scan_builder.set_exclusive_start_key(Some(key));
            }

            let result = scan_builder
                .send()
                .await
                .map_err(|e| ItemRepositoryError::ReadError(e.into_service_error().to_string()))?;

            if let Some(attributes_list) = result.items {
                for attributes in attributes_list {
                    items.push(Self::item_from_attributes(&attributes)?);
                }
            }

            // 次のページがあるか確認
            match result.last_evaluated_key {
                Some(key) => last_evaluated_key = Some(key),
                None => break, // 全データ取得完了
            }
        }

        Ok(items)
    }
}
