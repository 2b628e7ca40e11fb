use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::parse::Parse;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Data, DeriveInput, Expr, Fields, LitStr, Token};

// 字段上声明的验证规则
enum RuleAttr {
    Number { min: Expr, max: Expr },
    OneOf(Vec<LitStr>),
}

impl RuleAttr {
    fn rule_type(&self) -> TokenStream2 {
        match self {
            RuleAttr::Number { .. } => quote!(::attr_guard::Number),
            RuleAttr::OneOf(_) => quote!(::attr_guard::OneOf),
        }
    }

    fn rule_expr(&self) -> TokenStream2 {
        match self {
            RuleAttr::Number { min, max } => quote! {
                ::attr_guard::Number::new(#min, #max)
            },
            RuleAttr::OneOf(options) => quote! {
                ::attr_guard::OneOf::new([#(#options),*])
            },
        }
    }
}

// 解析 #[validate(number(min = .., max = ..))] 或 #[validate(one_of("a", "b"))]
fn parse_rule(field: &syn::Field) -> syn::Result<RuleAttr> {
    let mut rule: Option<RuleAttr> = None;

    for attr in &field.attrs {
        if !attr.path().is_ident("validate") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if rule.is_some() {
                return Err(meta.error("only one validation rule per field is supported"));
            }

            if meta.path.is_ident("number") {
                let mut min: Option<Expr> = None;
                let mut max: Option<Expr> = None;

                meta.parse_nested_meta(|arg| {
                    if arg.path.is_ident("min") {
                        min = Some(arg.value()?.parse()?);
                        Ok(())
                    } else if arg.path.is_ident("max") {
                        max = Some(arg.value()?.parse()?);
                        Ok(())
                    } else {
                        Err(arg.error("expected `min` or `max`"))
                    }
                })?;

                match (min, max) {
                    (Some(min), Some(max)) => {
                        rule = Some(RuleAttr::Number { min, max });
                        Ok(())
                    }
                    _ => Err(meta.error("`number` requires both `min` and `max`")),
                }
            } else if meta.path.is_ident("one_of") {
                let content;
                syn::parenthesized!(content in meta.input);
                let options: Punctuated<LitStr, Token![,]> =
                    content.parse_terminated(<LitStr as Parse>::parse, Token![,])?;

                if options.is_empty() {
                    return Err(meta.error("`one_of` needs at least one option"));
                }

                rule = Some(RuleAttr::OneOf(options.into_iter().collect()));
                Ok(())
            } else {
                Err(meta.error("expected `number(..)` or `one_of(..)`"))
            }
        })?;
    }

    rule.ok_or_else(|| {
        syn::Error::new_spanned(field, "missing #[validate(..)] attribute on Record field")
    })
}

/// 为带 `#[validate(..)]` 字段的结构体生成验证记录
///
/// 每个字段必须是 `attr_guard::Slot`，并且恰好声明一条规则：
///
/// ```rust,ignore
/// #[derive(Record)]
/// struct Order {
///     #[validate(number(min = 1, max = 10))]
///     quantity: Slot,
///     #[validate(one_of("small", "large"))]
///     size: Slot,
/// }
/// ```
///
/// 生成：
/// - `quantity_field()`：共享的字段描述符
/// - `new(quantity, size)`：按声明顺序验证，遇到第一个错误即失败
/// - `quantity()` / `set_quantity(..)`：经过验证的读写
/// - `FIELD_NAMES`：按声明顺序的字段名
#[proc_macro_derive(Record, attributes(validate))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_record(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_record(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Record can only be derived for structs",
            ))
        }
    };

    let mut accessors = Vec::new();
    let mut params = Vec::new();
    let mut stores = Vec::new();
    let mut idents = Vec::new();
    let mut names = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let rule = parse_rule(field)?;

        let field_name = ident.to_string();
        let descriptor = format_ident!("{}_field", ident);
        let setter = format_ident!("set_{}", ident);
        let rule_type = rule.rule_type();
        let rule_expr = rule.rule_expr();

        accessors.push(quote! {
            pub fn #descriptor() -> &'static ::attr_guard::Field<#rule_type> {
                static FIELD: ::std::sync::OnceLock<::attr_guard::Field<#rule_type>> =
                    ::std::sync::OnceLock::new();
                FIELD.get_or_init(|| ::attr_guard::Field::bind(#field_name, #rule_expr))
            }

            pub fn #ident(&self) -> ::attr_guard::ValidationResult<&::attr_guard::Value> {
                Self::#descriptor().get(&self.#ident)
            }

            pub fn #setter(
                &mut self,
                value: impl ::std::convert::Into<::attr_guard::Value>,
            ) -> ::attr_guard::ValidationResult<()> {
                Self::#descriptor().set(&mut self.#ident, value)
            }
        });

        params.push(quote! {
            #ident: impl ::std::convert::Into<::attr_guard::Value>
        });

        // 参数在同名 slot 遮蔽它之前被消费
        stores.push(quote! {
            let #ident = {
                let mut __slot = ::attr_guard::Slot::new();
                Self::#descriptor().set(&mut __slot, #ident)?;
                __slot
            };
        });

        idents.push(ident.clone());
        names.push(field_name);
    }

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            pub const FIELD_NAMES: &'static [&'static str] = &[#(#names),*];

            pub fn new(#(#params),*) -> ::attr_guard::ValidationResult<Self> {
                #(#stores)*
                ::std::result::Result::Ok(Self { #(#idents),* })
            }

            #(#accessors)*
        }
    })
}
