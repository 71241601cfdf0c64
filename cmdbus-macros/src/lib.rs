use proc_macro::TokenStream;

mod command;

/// 命令宏
/// - 为结构体/枚举实现 `::cmdbus_core::command::Command`
/// - 支持参数：
///   - `name = "..."`：命令稳定名称，默认取类型名
///   - `output = Type`：处理成功的结果类型，默认 `()`
///
/// ```ignore
/// #[command(name = "account.open", output = AccountId)]
/// struct OpenAccount { owner: String }
/// ```
#[proc_macro_attribute]
pub fn command(attr: TokenStream, item: TokenStream) -> TokenStream {
    command::expand(attr, item)
}
