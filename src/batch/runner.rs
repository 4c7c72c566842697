//! # 批量执行器
//!
//! 并行处理多条曲线；每条曲线相互独立。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代，结果保持输入顺序
//! - 进度条显示
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::utils::progress;
use lipidsaxs::error::{Result, SaxsError};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// 单个文件处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult<T> {
    /// 处理成功，携带结果
    Success(T),
    /// 跳过（如搜索区间内没有数据）
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (文件路径, 错误信息)
}

/// 批量处理结果统计
#[derive(Debug)]
pub struct BatchResult<T> {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
    /// 跳过的原因
    pub skips: Vec<String>,
    pub failures: Vec<(String, String)>,
    /// 成功结果，按输入顺序
    pub outputs: Vec<(PathBuf, T)>,
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self {
            success: 0,
            skipped: 0,
            failed: 0,
            skips: Vec::new(),
            failures: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

impl<T> BatchResult<T> {
    /// 合并处理结果
    pub fn merge(&mut self, path: PathBuf, result: ProcessResult<T>) {
        match result {
            ProcessResult::Success(output) => {
                self.success += 1;
                self.outputs.push((path, output));
            }
            ProcessResult::Skipped(reason) => {
                self.skipped += 1;
                self.skips.push(reason);
            }
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    jobs: usize,
}

impl BatchRunner {
    /// `jobs` 为 0 时使用全部 CPU
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    /// 并行处理文件列表
    pub fn run<T, F>(&self, files: Vec<PathBuf>, processor: F) -> Result<BatchResult<T>>
    where
        T: Send,
        F: Fn(&Path) -> ProcessResult<T> + Sync + Send,
    {
        let pb = progress::create_progress_bar(files.len() as u64, "Analyzing");
        let failed_count = AtomicUsize::new(0);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| SaxsError::Other(format!("Failed to start worker pool: {}", e)))?;

        let results: Vec<ProcessResult<T>> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let result = processor(file.as_path());

                    if let ProcessResult::Failed(_, _) = &result {
                        let failed = failed_count.fetch_add(1, Ordering::Relaxed) + 1;
                        pb.set_message(format!("Analyzing ({} failed)", failed));
                    }

                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        let mut batch_result = BatchResult::default();
        for (path, result) in files.into_iter().zip(results) {
            batch_result.merge(path, result);
        }

        Ok(batch_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_keep_input_order() {
        let files: Vec<PathBuf> = (0..20).map(|i| PathBuf::from(format!("f{}", i))).collect();
        let result = BatchRunner::new(4)
            .run(files, |path| {
                let name = path.display().to_string();
                match name.as_str() {
                    "f3" => ProcessResult::Skipped(name),
                    "f7" => ProcessResult::Failed(name, "boom".to_string()),
                    _ => ProcessResult::Success(name.len()),
                }
            })
            .unwrap();

        assert_eq!(result.total(), 20);
        assert_eq!(result.success, 18);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.skips, vec!["f3".to_string()]);
        assert_eq!(result.failures, vec![("f7".to_string(), "boom".to_string())]);
        assert_eq!(result.outputs[0].0, PathBuf::from("f0"));
        assert_eq!(result.outputs[17].0, PathBuf::from("f19"));
    }
}
