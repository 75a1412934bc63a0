// ==========================================
// TaskRay 示例数据导入器 - CSV 解析器
// ==========================================
// 职责: CSV 文本/文件 → 有序原始行（首行为表头）
// ==========================================

use crate::domain::RawRow;
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

// ==========================================
// CsvParser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 解析 CSV 文本
    pub fn parse_str(&self, text: &str) -> ImportResult<Vec<RawRow>> {
        self.parse_reader(text.as_bytes())
    }

    /// 解析本地 CSV 文件
    pub fn parse_file(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }
        let file = std::fs::File::open(file_path)?;
        self.parse_reader(file)
    }

    fn parse_reader<R: Read>(&self, source: R) -> ImportResult<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(source);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: RawRow = record
                .iter()
                .zip(headers.iter())
                .map(|(value, header)| (header.clone(), value.to_string()))
                .collect();

            // 跳过完全空白的行（单元格取值本身不做修剪）
            if row.iter().all(|(_, v)| v.trim().is_empty()) {
                continue;
            }

            rows.push(row);
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_str_preserves_column_order() {
        let text = "Id,Name,TASKRAY__Project__c\n$T1,Design,$P1\n$T2,Build,$P1\n";
        let rows = CsvParser.parse_str(text).unwrap();

        assert_eq!(rows.len(), 2);
        let names: Vec<&str> = rows[0].iter().map(|(h, _)| h.as_str()).collect();
        assert_eq!(names, vec!["Id", "Name", "TASKRAY__Project__c"]);
        assert_eq!(rows[1][1], ("Name".to_string(), "Build".to_string()));
    }

    #[test]
    fn test_parse_keeps_empty_cells_and_skips_blank_rows() {
        let text = "Id,Name,Notes\n$P1,Alpha,\n,,\n$P2,Beta,x\n";
        let rows = CsvParser.parse_str(text).unwrap();

        assert_eq!(rows.len(), 2);
        // 空单元格保留为空字符串，由解析器规则删除
        assert_eq!(rows[0][2], ("Notes".to_string(), String::new()));
    }

    #[test]
    fn test_parse_preserves_cell_whitespace() {
        let text = "Id , Description,Notes\n$P1,  padded  ,   \n";
        let rows = CsvParser.parse_str(text).unwrap();

        assert_eq!(rows[0][0], ("Id".to_string(), "$P1".to_string()));
        assert_eq!(
            rows[0][1],
            ("Description".to_string(), "  padded  ".to_string())
        );
        assert_eq!(rows[0][2], ("Notes".to_string(), "   ".to_string()));
    }

    #[test]
    fn test_parse_quoted_values() {
        let text = "Id,Description\n$P1,\"Kickoff, planning and review\"\n";
        let rows = CsvParser.parse_str(text).unwrap();
        assert_eq!(rows[0][1].1, "Kickoff, planning and review");
    }

    #[test]
    fn test_parse_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Id,Name").unwrap();
        writeln!(temp_file, "$P1,Alpha").unwrap();

        let rows = CsvParser.parse_file(temp_file.path()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_parse_file_not_found() {
        let result = CsvParser.parse_file(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
