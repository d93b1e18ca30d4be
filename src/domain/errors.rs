/// 予約作成のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateBookingError {
    /// アイテムが貸出可能でない
    ItemNotAvailable,
    /// オーナーは自分のアイテムを予約できない
    OwnerCannotBook,
    /// 予約期間が不正（開始・終了が未来でない、または終了が開始以前）
    InvalidPeriod,
}

/// 予約承認のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    /// 既に承認または却下済み
    AlreadyDecided,
    /// アイテムのオーナー以外は承認できない
    NotItemOwner,
}

/// 状態フィルタのパースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownState(pub String);

/// ユーザー入力のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    BlankName,
    InvalidEmail,
}

/// アイテム入力のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    BlankName,
    BlankDescription,
}

/// コメント作成のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentError {
    BlankText,
}

/// アイテムリクエスト作成のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRequestError {
    BlankDescription,
}

impl std::fmt::Display for CreateBookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            CreateBookingError::ItemNotAvailable => "item is not available for booking",
            CreateBookingError::OwnerCannotBook => "owner cannot book own item",
            CreateBookingError::InvalidPeriod => {
                "booking period must lie in the future and end after it starts"
            }
        };
        f.write_str(msg)
    }
}

impl std::fmt::Display for ApprovalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ApprovalError::AlreadyDecided => "booking has already been decided",
            ApprovalError::NotItemOwner => "only the item owner can approve a booking",
        };
        f.write_str(msg)
    }
}

impl std::fmt::Display for UnknownState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown state: {}", self.0)
    }
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            UserError::BlankName => "user name must not be blank",
            UserError::InvalidEmail => "email must not be blank and must contain '@'",
        };
        f.write_str(msg)
    }
}

impl std::fmt::Display for ItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ItemError::BlankName => "item name must not be blank",
            ItemError::BlankDescription => "item description must not be blank",
        };
        f.write_str(msg)
    }
}

impl std::fmt::Display for CommentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentError::BlankText => f.write_str("comment text must not be blank"),
        }
    }
}

impl std::fmt::Display for ItemRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemRequestError::BlankDescription => {
                f.write_str("item request description must not be blank")
            }
        }
    }
}
