// ルートキー分類
//
// API Gatewayが渡すルートキー（HTTPメソッド + パスパターン）を
// サポートされる4操作の閉じた列挙に分類する。
// 文字列ディスパッチではなく列挙でマッチすることで、操作の追加漏れを
// コンパイル時に検出できる。

/// サポートされるルート
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// DELETE /items/{id} - アイテム削除
    DeleteItem,
    /// GET /items/{id} - アイテム単体取得
    GetItem,
    /// GET /items - アイテム全件取得
    ListItems,
    /// PUT /items - アイテム作成/完全置換
    PutItem,
}

impl Route {
    /// ルートキー文字列を分類（完全一致）
    ///
    /// # 戻り値
    /// * `Some(Route)` - サポートされるルートキーの場合
    /// * `None` - 未サポートのルートキーの場合
    pub fn parse(route_key: &str) -> Option<Self> {
        match route_key {
            "DELETE /items/{id}" => Some(Route::DeleteItem),
            "GET /items/{id}" => Some(Route::GetItem),
            "GET /items" => Some(Route::ListItems),
            "PUT /items" => Some(Route::PutItem),
            _ => None,
        }
    }

    /// ルートに対応するルートキー文字列を取得
    pub fn route_key(&self) -> &'static str {
        match self {
            Route::DeleteItem => "DELETE /items/{id}",
            Route::GetItem => "GET /items/{id}",
            Route::ListItems => "GET /items",
            Route::PutItem => "PUT /items",
        }
    }
}
