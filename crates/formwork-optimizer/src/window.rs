//! 滑動窗口計算
//!
//! 一次澆置後模板鎖定 `window` 天。某日仍鎖定的套數等於
//! `[t - window + 1, t]` 內的澆置合計；所有日子中的最大值即為最少套數：
//! 少於此值在峰值當日必然不夠，而峰值又涵蓋了其他每一天。

/// 每日尾隨窗口合計（前綴和，線性時間）
pub fn trailing_window_sums(pours: &[u32], window: u32) -> Vec<u32> {
    let window = window.max(1) as usize;

    let mut prefix = Vec::with_capacity(pours.len() + 1);
    prefix.push(0u64);
    for &count in pours {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + u64::from(count));
    }

    (0..pours.len())
        .map(|t| {
            let lo = (t + 1).saturating_sub(window);
            (prefix[t + 1] - prefix[lo]) as u32
        })
        .collect()
}

/// 最大尾隨窗口合計；空序列為 0
pub fn peak_window_sum(pours: &[u32], window: u32) -> u32 {
    trailing_window_sums(pours, window)
        .into_iter()
        .max()
        .unwrap_or(0)
}
