//! # 文件收集器
//!
//! 根据输入路径和模式收集待处理的曲线文件。
//!
//! ## 功能
//! - 单文件与目录输入
//! - glob 模式匹配（逗号分隔多个模式）
//! - 可选递归搜索
//! - 自然排序：`scan_9` 排在 `scan_10` 之前，批处理清单按采集顺序输出
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use lipidsaxs::error::{Result, SaxsError};

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    input: PathBuf,
    patterns: Vec<glob::Pattern>,
    recursive: bool,
}

impl FileCollector {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: Vec::new(),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                glob::Pattern::new(s).map_err(|e| {
                    SaxsError::InvalidArgument(format!("invalid pattern '{}': {}", s, e))
                })
            })
            .collect::<Result<_>>()?;
        Ok(self)
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件（自然排序）
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if self.input.is_file() {
            return Ok(vec![self.input.clone()]);
        }

        if !self.input.is_dir() {
            return Err(SaxsError::DirectoryNotFound {
                path: self.input.display().to_string(),
            });
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches_patterns(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
        Ok(files)
    }

    /// 没有模式时匹配所有文件
    fn matches_patterns(&self, path: &Path) -> bool {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(filename))
    }
}

/// 自然序比较：连续数字按数值比较，其余按字符比较
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let n = take_number(&mut left);
                let m = take_number(&mut right);
                // 先比位数（去前导零），再逐位比较，避免溢出
                let ordering = n
                    .trim_start_matches('0')
                    .len()
                    .cmp(&m.trim_start_matches('0').len())
                    .then_with(|| n.trim_start_matches('0').cmp(m.trim_start_matches('0')))
                    .then_with(|| n.len().cmp(&m.len()));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_order() {
        let mut names = vec!["scan_10.dat", "scan_9.dat", "scan_100.dat", "scan_1.dat"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(
            names,
            vec!["scan_1.dat", "scan_9.dat", "scan_10.dat", "scan_100.dat"]
        );
    }

    #[test]
    fn test_natural_order_text_and_zeros() {
        assert_eq!(natural_cmp("a2", "b1"), Ordering::Less);
        assert_eq!(natural_cmp("x007", "x7"), Ordering::Greater);
        assert_eq!(natural_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_pattern_matching() {
        let collector = FileCollector::new(PathBuf::from("."))
            .with_pattern("*.dat, *_saxs.csv")
            .unwrap();
        assert!(collector.matches_patterns(Path::new("run/00123.dat")));
        assert!(collector.matches_patterns(Path::new("b_saxs.csv")));
        assert!(!collector.matches_patterns(Path::new("notes.txt")));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(FileCollector::new(PathBuf::from("."))
            .with_pattern("[")
            .is_err());
    }

    #[test]
    fn test_missing_directory() {
        let result = FileCollector::new(PathBuf::from("no/such/saxs/folder")).collect();
        assert!(matches!(result, Err(SaxsError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_collect_in_natural_order() {
        let dir = std::env::temp_dir().join(format!("lipidsaxs_collect_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["scan_10.dat", "scan_9.dat", "notes.txt"] {
            std::fs::write(dir.join(name), "0.1 1.0\n").unwrap();
        }

        let files = FileCollector::new(dir.clone())
            .with_pattern("*.dat")
            .unwrap()
            .collect()
            .unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        let names: Vec<_> = files
            .iter()
            .filter_map(|f| f.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["scan_9.dat", "scan_10.dat"]);
    }
}
