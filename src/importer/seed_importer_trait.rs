// ==========================================
// TaskRay 示例数据导入器 - 数据源 Trait
// ==========================================
// 职责: 定义数据集拉取接口（不包含实现）
// ==========================================

use crate::config::DatasetSpec;
use crate::domain::RawRow;
use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// DatasetSource Trait
// ==========================================
// 用途: 按记录集名拉取原始行
// 实现者: HttpCsvSource, LocalCsvSource
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// 拉取单个数据集
    ///
    /// # 参数
    /// - dataset: 数据集声明（对象名 + 地址）
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 解码后的行（列名 → 字符串值）
    /// - Err: 下载/读取/解码失败
    async fn fetch(&self, dataset: &DatasetSpec) -> ImportResult<Vec<RawRow>>;
}
