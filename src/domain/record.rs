// ==========================================
// TaskRay 示例数据导入器 - 记录与字段值模型
// ==========================================
// 职责: 字段值标签化分类（解析时一次完成）、有序记录、记录集
// 红线: 不含注册表查询、不含日期计算
// ==========================================

use crate::domain::types::field_names;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// 原始行记录（列名, 值），保留 CSV 列顺序
pub type RawRow = Vec<(String, String)>;

const PLACEHOLDER_PREFIX: char = '$';
const TODAY_TOKEN: &str = "$TODAY";
const DAYS_AFTER_PREFIX: &str = "$T+";
const DAYS_BEFORE_PREFIX: &str = "$T-";
const USER_PREFIX: &str = "$User: ";
const ACCOUNT_PREFIX: &str = "$Account: ";
const OPP_PREFIX: &str = "$Opp: ";

// ==========================================
// PlaceholderKind - 占位符类别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    /// `$User: <key>`，未解析时回退为当前操作者
    User,
    /// `$Account: <key>`，未解析时删除字段
    Account,
    /// `$Opp: <key>`，未解析时删除字段
    Opp,
    /// 其他 `$<key>`，未解析时整条记录延后
    Generic,
}

/// 符号占位符（raw 为完整原文，同时是注册表键）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub raw: String,
}

// ==========================================
// RelativeDate - 相对日期表达式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDate {
    /// `$TODAY`
    Today,
    /// `$T+n`（n 可为负）
    DaysAfter(i64),
    /// `$T-n`（n 可为负）
    DaysBefore(i64),
}

impl fmt::Display for RelativeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeDate::Today => f.write_str(TODAY_TOKEN),
            RelativeDate::DaysAfter(n) => write!(f, "{}{}", DAYS_AFTER_PREFIX, n),
            RelativeDate::DaysBefore(n) => write!(f, "{}{}", DAYS_BEFORE_PREFIX, n),
        }
    }
}

// ==========================================
// FieldValue - 标签化字段值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Boolean(bool),
    Literal(String),
    /// 数值（日期字段解析后的毫秒时间戳）
    Number(i64),
    RelativeDate(RelativeDate),
    Placeholder(Placeholder),
}

impl FieldValue {
    /// 对原始字符串进行一次性分类
    ///
    /// # 规则
    /// - "" → Empty
    /// - `$TODAY` / `$T+n` / `$T-n` → RelativeDate
    /// - `$T+` / `$T-` 后天数按 parseInt 规则读取（前导空白、可选符号、数字前缀）
    /// - 读不出天数 → Literal（原样保留，不延后）
    /// - `$User: ` / `$Account: ` / `$Opp: ` → 对应类别占位符
    /// - 其余 `$` 开头 → Generic 占位符
    /// - 其他 → Literal
    pub fn classify(raw: &str) -> FieldValue {
        if raw.is_empty() {
            return FieldValue::Empty;
        }
        if !raw.starts_with(PLACEHOLDER_PREFIX) {
            return FieldValue::Literal(raw.to_string());
        }
        if raw == TODAY_TOKEN {
            return FieldValue::RelativeDate(RelativeDate::Today);
        }
        if let Some(rest) = raw.strip_prefix(DAYS_AFTER_PREFIX) {
            return match parse_leading_days(rest) {
                Some(n) => FieldValue::RelativeDate(RelativeDate::DaysAfter(n)),
                None => FieldValue::Literal(raw.to_string()),
            };
        }
        if let Some(rest) = raw.strip_prefix(DAYS_BEFORE_PREFIX) {
            return match parse_leading_days(rest) {
                Some(n) => FieldValue::RelativeDate(RelativeDate::DaysBefore(n)),
                None => FieldValue::Literal(raw.to_string()),
            };
        }

        let kind = if raw.starts_with(USER_PREFIX) {
            PlaceholderKind::User
        } else if raw.starts_with(ACCOUNT_PREFIX) {
            PlaceholderKind::Account
        } else if raw.starts_with(OPP_PREFIX) {
            PlaceholderKind::Opp
        } else {
            PlaceholderKind::Generic
        };
        FieldValue::Placeholder(Placeholder {
            kind,
            raw: raw.to_string(),
        })
    }

    /// 文本形式（Literal 或占位符原文）
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Literal(s) => Some(s),
            FieldValue::Placeholder(p) => Some(&p.raw),
            _ => None,
        }
    }

    /// 是否仍携带 `$` 前缀
    pub fn is_dollar_prefixed(&self) -> bool {
        match self {
            FieldValue::Placeholder(_) | FieldValue::RelativeDate(_) => true,
            FieldValue::Literal(s) => s.starts_with(PLACEHOLDER_PREFIX),
            _ => false,
        }
    }
}

/// 按 parseInt 规则读取天数（"7" → 7, "10d" → 10, " 5" → 5, "-3" → -3, "" → None）
fn parse_leading_days(rest: &str) -> Option<i64> {
    let rest = rest.trim_start();
    let (negative, digits) = match rest.strip_prefix('-') {
        Some(tail) => (true, tail),
        None => (false, rest.strip_prefix('+').unwrap_or(rest)),
    };
    let digits: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    let n: i64 = digits.parse().ok()?;
    Some(if negative { -n } else { n })
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Empty => serializer.serialize_none(),
            FieldValue::Boolean(b) => serializer.serialize_bool(*b),
            FieldValue::Literal(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => serializer.serialize_i64(*n),
            FieldValue::RelativeDate(d) => serializer.collect_str(d),
            FieldValue::Placeholder(p) => serializer.serialize_str(&p.raw),
        }
    }
}

// ==========================================
// Record - 有序字段映射
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从原始行构建记录（每个值在此处完成分类）
    ///
    /// 表头重复的列以最后一个值为准（保留首次出现的位置）。
    pub fn from_raw_row(row: RawRow) -> Self {
        let mut record = Self::default();
        for (name, raw) in row {
            record.set(&name, FieldValue::classify(&raw));
        }
        record
    }

    /// 追加或覆盖字段（原始字符串，自动分类）
    pub fn with_raw(mut self, name: &str, raw: &str) -> Self {
        self.set(name, FieldValue::classify(raw));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// 覆盖已有字段（保持原位置），不存在则追加
    pub fn set(&mut self, name: &str, value: FieldValue) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let idx = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 导入前的符号标识（Id 字段原文）
    pub fn source_identifier(&self) -> Option<&str> {
        self.get(field_names::IDENTIFIER).and_then(FieldValue::as_text)
    }

    /// 除 Id 字段外，是否仍存在 `$` 前缀取值
    pub fn has_unresolved_values(&self) -> bool {
        self.fields()
            .any(|(name, value)| name != field_names::IDENTIFIER && value.is_dollar_prefixed())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ==========================================
// RecordSet - 同一目标对象的记录集合
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSet {
    pub object_name: String,
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn new(object_name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            object_name: object_name.into(),
            records,
        }
    }

    pub fn from_raw_rows(object_name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self::new(
            object_name,
            rows.into_iter().map(Record::from_raw_row).collect(),
        )
    }

    pub fn empty(object_name: impl Into<String>) -> Self {
        Self::new(object_name, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
