// crates/fp_physics/src/boundary/mod.rs

//! 入流边界条件合成
//!
//! 将一个标量流量转换为入流边界上沿列分布的水深与流速剖面：
//!
//! 1. 按 `(low, high]` 选择流量分档
//! 2. 计算单宽项 `top_height = (Q - low) / (n * dx)`
//! 3. 端点列取 `top_height`，内部列叠加相对首列的床面高差，
//!    使入流断面近似为水平水面
//!
//! 剖面写入求解器输入卡片由 `fp_io::deck` 完成。

mod profile;

pub use profile::{synthesize, InflowProfile};
