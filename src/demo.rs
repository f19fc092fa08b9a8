//! Sample suites shown by the binary
//!
//! Covers every outcome the explorer can display: passing, failing and
//! erroring tests, parameterised cases, and same-named tests that need
//! disambiguation in the category view.

use anyhow::Context;
use serde_json::json;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

use caseview::assert;
use caseview::registry::{arg, CaseDef, Registry, RegistryError, TestDef};

pub fn registry() -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();

    registry
        .suite("samples", "TestClass")
        .category("Base")
        .add(
            TestDef::sync("MostBasicTestMethod", |_| Ok(assert::same(true, true, "")?))
                .category("Cat3"),
        )?
        .add(
            TestDef::sync("TestMethodWithFailMessage", |_| {
                Ok(assert::same(
                    true,
                    false,
                    "This is a fail message, and this test should fail",
                )?)
            })
            .category("Cat1/Cat2"),
        )?
        .add(
            TestDef::sync("ParameterTest", |args| {
                let count: i64 = arg(&args, 0)?;
                let word: String = arg(&args, 1)?;
                assert::same(count, word.len() as i64 - 3, "one case passes, one fails")?;
                Ok(())
            })
            .named("CustomNamesParameterTest")
            .param("param1", "i64")
            .param("param2", "String")
            .case(CaseDef::named("HelloCase", vec![json!(2), json!("Hello")]))
            .case(CaseDef::named("WorldCase", vec![json!(1), json!("World")])),
        )?
        .add(
            TestDef::sync("MultiLineInput", |args| {
                let text: String = arg(&args, 0)?;
                assert::is_true(text.lines().count() == 2, "expected two lines")?;
                Ok(())
            })
            .param("text", "String")
            .case(CaseDef::new(vec![json!("first line\nsecond line")])),
        )?;

    registry
        .suite("net::http", "ClientTests")
        .category("Net/HTTP")
        .add(TestDef::new("Check", |_| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            anyhow::Ok(())
        }))?
        .add(
            TestDef::sync("ParsesStatusLine", |args| {
                let line: String = arg(&args, 0)?;
                let code: u16 = arg(&args, 1)?;
                let parsed: u16 = line
                    .split_whitespace()
                    .nth(1)
                    .context("status line has no code")?
                    .parse()
                    .context("status code is not a number")?;
                assert::same(parsed, code, "")?;
                Ok(())
            })
            .param("line", "String")
            .param("code", "u16")
            .case(CaseDef::named("ok", vec![json!("HTTP/1.1 200 OK"), json!(200)]))
            .case(CaseDef::named(
                "not found",
                vec![json!("HTTP/1.1 404 Not Found"), json!(404)],
            ))
            .case(CaseDef::named("garbage", vec![json!("HTTP/1.1"), json!(500)])),
        )?;

    registry
        .suite("net::http", "ServerTests")
        .category("Net/HTTP")
        .add(TestDef::new("Check", |_| async {
            tokio::time::sleep(Duration::from_millis(600)).await;
            anyhow::Ok(())
        }))?
        .add(TestDef::sync("HandlesShutdown", |_| {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "io fail"))
                .context("listener closed while draining connections")
        }))?;

    registry
        .suite("legacy::http", "ServerTests")
        .category("Net/HTTP")
        .add(TestDef::new("Check", |_| async {
            tokio::time::sleep(Duration::from_millis(450)).await;
            assert::same("HTTP/1.0", "HTTP/1.1", "legacy server still speaks 1.0")?;
            anyhow::Ok(())
        }))?;

    registry
        .suite("storage", "DiskTests")
        .add(TestDef::sync("Flush", |_| {
            let buffered: Vec<u8> = Vec::new();
            if buffered.is_empty() {
                panic!("nothing to flush");
            }
            Ok(())
        }))?
        .add(TestDef::sync("IndexMatches", |_| {
            let expected = HashMap::from([("a", 1), ("b", 2)]);
            let actual = HashMap::from([("b", 2), ("a", 1)]);
            assert::same_map(&actual, &expected, "")?;
            Ok(())
        }))?
        .add(TestDef::sync("RejectsEmptyKey", |_| {
            assert::fails(
                || -> anyhow::Result<()> { anyhow::bail!("empty key") },
                "empty key",
                "",
            )?;
            Ok(())
        }))?;

    Ok(registry)
}
