//! `#[derive(Injectable)]` 编译期测试
//!
//! 测试用例位于 `tests/trybuild`，每个用例都是独立编译的程序。
