//! 注册触发器单元测试
