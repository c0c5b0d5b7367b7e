// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 集成测试
//!
//! DC Inside 适配器对接 wiremock 服务器，Arca Live 适配器使用按URL返回预置页面的假浏览器。

mod helpers;

mod arcalive_adapter_test;
mod orchestrator_test;
