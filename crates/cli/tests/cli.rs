use assert_cmd::Command;

fn catalog() -> Command {
    let mut cmd = Command::cargo_bin("catalog").unwrap();
    // Port 9 (discard) is never served; nothing in these tests reaches the network
    cmd.env("CATALOG_API_URL", "http://127.0.0.1:9");
    cmd
}

#[test]
fn help_lists_commands() {
    let assert = catalog().arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    for command in ["list", "get", "create", "update", "delete", "migrate"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn invalid_product_is_rejected_before_sending() {
    let assert = catalog()
        .args(["create", "--name", "", "--description", "A cap", "--price", "0"])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();

    assert!(stderr.contains("name: Product name is required"));
    assert!(stderr.contains("price: Price must be greater than 0"));
    assert!(stderr.contains("invalid product"));
}

#[test]
fn declining_delete_sends_nothing() {
    let assert = catalog()
        .args(["delete", "3"])
        .write_stdin("n\n")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    assert!(stdout.contains("Aborted"));
}

#[test]
fn unreachable_api_reports_generic_message() {
    let assert = catalog().args(["get", "1"]).assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();

    assert!(stderr.contains("Something went wrong. Please try again."));
}

#[test]
fn malformed_price_is_a_usage_error() {
    catalog()
        .args(["create", "--name", "Cap", "--description", "A cap", "--price", "cheap"])
        .assert()
        .failure();
}
