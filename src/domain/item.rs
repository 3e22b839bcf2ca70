/// アイテムエンティティ
///
/// このAPIが永続化する唯一のエンティティ。idがDynamoDBのパーティションキーとなり、
/// 同一idへの書き込みは既存アイテムを完全に置き換える（部分更新はしない）。
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ストアに保存されるアイテム
///
/// priceは内部的に正確な10進数（Decimal）として保持し、
/// JSONシリアライズ時のみ浮動小数点表現に変換する（serde-float）。
/// 境界での精度劣化は許容された制限事項であり、保存形式は常に正確な10進数文字列。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// 一意識別子（呼び出し側が指定、パーティションキー）
    pub id: String,
    /// 自由形式のラベル
    pub name: String,
    /// 価格（正確な10進数）
    pub price: Decimal,
}

impl Item {
    /// 新しいアイテムを作成
    pub fn new(id: String, name: String, price: Decimal) -> Self {
        Self { id, name, price }
    }
}
