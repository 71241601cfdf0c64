use cmdbus_core::command::Command;
use cmdbus_macros::command;

#[command]
struct Ping;

#[command(name = "account.open", output = u64)]
#[derive(Debug, Clone)]
struct OpenAccount {
    owner: String,
}

#[command(name = "account.adjust")]
enum AdjustBalance {
    Credit { amount: i64 },
    Debit { amount: i64 },
}

fn main() {
    assert_eq!(<Ping as Command>::NAME, "Ping");
    assert_eq!(<OpenAccount as Command>::NAME, "account.open");
    assert_eq!(<AdjustBalance as Command>::NAME, "account.adjust");

    let out: <OpenAccount as Command>::Output = 7u64;
    let _ = out;
    let unit: <Ping as Command>::Output = ();
    let _ = unit;

    let cmd = OpenAccount { owner: "alice".into() };
    assert!(cmd.validate().is_ok());
    let _ = cmd.clone().owner;

    let _ = AdjustBalance::Credit { amount: 1 };
    let _ = AdjustBalance::Debit { amount: 1 };
}
