//! # 峰位叠加图
//!
//! 使用 `plotters` 绘制搜索区间内的 log(I)-q 曲线，并在每个检测到的峰位画竖线。
//! 输出格式由扩展名决定：`.svg` 为 SVG，其余为 PNG。
//!
//! ## 依赖关系
//! - 被 `commands/find.rs` 与 `commands/analyze.rs` 调用
//! - 使用 `models/` 的 Spectrum 与 PeakSet
//! - 使用 `plotters` 渲染图表

use crate::error::{Result, SaxsError};
use crate::models::{PeakSet, Spectrum};

use plotters::prelude::*;
use std::path::Path;

/// 图片尺寸（像素）
pub const DEFAULT_SIZE: (u32, u32) = (1024, 640);

/// 绘制曲线与峰位标记
pub fn plot_peaks(
    spectrum: &Spectrum,
    peaks: &PeakSet,
    q_range: (f64, f64),
    output_path: &Path,
    size: (u32, u32),
) -> Result<()> {
    let use_svg = output_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if use_svg {
        let root = SVGBackend::new(output_path, size).into_drawing_area();
        draw_chart(&root, spectrum, peaks, q_range)?;
        root.present()
            .map_err(|e| SaxsError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_chart(&root, spectrum, peaks, q_range)?;
        root.present()
            .map_err(|e| SaxsError::PlotError(e.to_string()))?;
    }
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    spectrum: &Spectrum,
    peaks: &PeakSet,
    (lo_q, hi_q): (f64, f64),
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| SaxsError::PlotError(format!("{:?}", e)))?;

    // 对数坐标只能画正强度
    let data: Vec<(f64, f64)> = spectrum
        .restrict(lo_q, hi_q)
        .points()
        .filter(|&(_, i)| i > 0.0)
        .collect();

    let (y_min, y_max) = if data.is_empty() {
        (0.1, 10.0)
    } else {
        let min = data.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max = data.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        (min * 0.8, max * 1.25)
    };

    let mut chart = ChartBuilder::on(root)
        .caption(&spectrum.name, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(lo_q..hi_q, (y_min..y_max).log_scale())
        .map_err(|e| SaxsError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("q (Å⁻¹)")
        .y_desc("Intensity (a.u.)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| SaxsError::PlotError(format!("{:?}", e)))?;

    let line_color = RGBColor(0, 102, 204);
    chart
        .draw_series(LineSeries::new(data.iter().copied(), line_color.stroke_width(2)))
        .map_err(|e| SaxsError::PlotError(format!("{:?}", e)))?;

    let marker_color = RGBColor(0, 153, 51);
    for peak in peaks.peaks() {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(peak.q, y_min), (peak.q, y_max)],
                marker_color.stroke_width(1),
            )))
            .map_err(|e| SaxsError::PlotError(format!("{:?}", e)))?;
    }

    Ok(())
}
