//! 通用工具函数

use uuid::Uuid;

/// 生成新的 UUID v7（时间有序）
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// 去掉首尾空白后判断字符串是否为空
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
