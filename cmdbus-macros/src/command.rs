use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    Ident, Item, Result as SynResult, Token, Type, parse::Parse, parse::ParseStream,
    parse_macro_input,
};

/// #[command] 宏实现
/// 仅支持结构体与枚举；保持原条目不变，追加 `Command` 实现。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as CommandAttrConfig);
    let input = parse_macro_input!(item as Item);

    let (ident, generics) = match &input {
        Item::Struct(s) => (s.ident.clone(), s.generics.clone()),
        Item::Enum(e) => (e.ident.clone(), e.generics.clone()),
        other => {
            return syn::Error::new(other.span(), "#[command] only on struct or enum")
                .to_compile_error()
                .into();
        }
    };

    let name = cfg
        .name
        .unwrap_or_else(|| syn::LitStr::new(&ident.to_string(), ident.span()));
    let output = cfg.output.unwrap_or_else(|| syn::parse_quote! { () });

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let out = quote! {
        #input

        impl #impl_generics ::cmdbus_core::command::Command for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            type Output = #output;
        }
    };

    TokenStream::from(out)
}

// 解析 command 宏键值参数：name = "<str>"、output = <Type>
struct CommandAttrConfig {
    name: Option<syn::LitStr>,
    output: Option<Type>,
}

impl Parse for CommandAttrConfig {
    fn parse(input: ParseStream) -> SynResult<Self> {
        let mut name: Option<syn::LitStr> = None;
        let mut output: Option<Type> = None;

        // 逐个解析 key = value；value 的语法取决于 key（字符串字面量或类型）
        while !input.is_empty() {
            let key: Ident = input.parse()?;
            let _eq: Token![=] = input.parse()?;

            match key.to_string().as_str() {
                "name" => {
                    if name.is_some() {
                        return Err(syn::Error::new(key.span(), "duplicate key 'name' in attribute"));
                    }
                    let lit: syn::LitStr = input.parse()?;
                    if lit.value().trim().is_empty() {
                        return Err(syn::Error::new(lit.span(), "command name must not be empty"));
                    }
                    name = Some(lit);
                }
                "output" => {
                    if output.is_some() {
                        return Err(syn::Error::new(
                            key.span(),
                            "duplicate key 'output' in attribute",
                        ));
                    }
                    output = Some(input.parse()?);
                }
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        "unknown key; expected 'name' | 'output'",
                    ));
                }
            }

            if input.is_empty() {
                break;
            }
            let _comma: Token![,] = input.parse()?;
        }

        Ok(Self { name, output })
    }
}
