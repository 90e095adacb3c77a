use std::borrow::Cow;

use proc_macro2::{TokenStream, Ident, Span};
use syn::{Attribute, Data, DataStruct, DeriveInput, Fields, FieldsNamed, FieldsUnnamed, Index, LitInt, Member};
use quote::quote;

struct FieldLayout {
	skip_before: usize,
	skip_after: usize,
}

fn parse_len(attr: &Attribute) -> usize {
	attr.parse_args::<LitInt>()
		.and_then(|lit| lit.base10_parse())
		.unwrap_or_else(|e| panic!("skip attribute takes a byte count: {}", e))
}

fn field_layout(attrs: &[Attribute]) -> FieldLayout {
	let mut layout = FieldLayout { skip_before: 0, skip_after: 0 };
	for attr in attrs {
		if let Some(ident) = attr.path().get_ident() {
			match ident.to_string().as_str() {
				"skip" => layout.skip_before += parse_len(attr),//padding bytes before the field
				"skip_after" => layout.skip_after += parse_len(attr),//padding bytes after the field
				_ => {},
			}
		}
	}
	layout
}

fn struct_fields(input: &DeriveInput) -> (&syn::punctuated::Punctuated<syn::Field, syn::token::Comma>, bool) {
	match &input.data {
		Data::Struct(DataStruct { fields: Fields::Named(FieldsNamed { named, .. }), .. }) => (named, false),
		Data::Struct(DataStruct { fields: Fields::Unnamed(FieldsUnnamed { unnamed, .. }), .. }) => (unnamed, true),
		_ => unimplemented!("only tuple struct or struct with named fields supported"),
	}
}

fn read_derive_impl(input: &DeriveInput) -> TokenStream {
	let (fields, tuple) = struct_fields(input);
	let mut body = quote! {};
	let mut initializer = quote! {};
	let mut tuple_field_num = 0u32..;
	for field in fields {
		let FieldLayout { skip_before, skip_after } = field_layout(&field.attrs);
		let field_ident = match &field.ident {
			Some(field_ident) => Cow::Borrowed(field_ident),
			None => Cow::Owned(Ident::new(&format!("field{}", tuple_field_num.next().unwrap()), Span::call_site())),
		};
		if skip_before > 0 {
			body = quote! { #body course_format::skip(reader, #skip_before)?; };
		}
		body = quote! {
			#body
			let #field_ident = course_format::Readable::read(reader)?;
		};
		if skip_after > 0 {
			body = quote! { #body course_format::skip(reader, #skip_after)?; };
		}
		initializer = quote! { #initializer #field_ident, };
	}
	initializer = if tuple { quote! { (#initializer) } } else { quote! { {#initializer} } };
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
	let type_name = &input.ident;
	quote! {
		impl #impl_generics course_format::Readable for #type_name #ty_generics #where_clause {
			fn read<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
				#body
				Ok(#type_name #initializer)
			}
		}
	}
}

fn write_derive_impl(input: &DeriveInput) -> TokenStream {
	let (fields, _) = struct_fields(input);
	let mut body = quote! {};
	for (index, field) in fields.iter().enumerate() {
		let FieldLayout { skip_before, skip_after } = field_layout(&field.attrs);
		let member = match &field.ident {
			Some(field_ident) => Member::Named(field_ident.clone()),
			None => Member::Unnamed(Index::from(index)),
		};
		if skip_before > 0 {
			body = quote! { #body course_format::pad(writer, #skip_before)?; };
		}
		body = quote! {
			#body
			course_format::Writable::write(&self.#member, writer)?;
		};
		if skip_after > 0 {
			body = quote! { #body course_format::pad(writer, #skip_after)?; };
		}
	}
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
	let type_name = &input.ident;
	quote! {
		impl #impl_generics course_format::Writable for #type_name #ty_generics #where_clause {
			fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
				#body
				Ok(())
			}
		}
	}
}

/// Reads the fields in declaration order, big-endian.
/// `#[skip(n)]` / `#[skip_after(n)]` consume padding bytes around a field.
#[proc_macro_derive(Readable, attributes(skip, skip_after))]
pub fn read_derive(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
	read_derive_impl(&syn::parse_macro_input!(tokens)).into()
}

/// Inverse of `Readable`; padding is written as zero bytes.
#[proc_macro_derive(Writable, attributes(skip, skip_after))]
pub fn write_derive(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
	write_derive_impl(&syn::parse_macro_input!(tokens)).into()
}
