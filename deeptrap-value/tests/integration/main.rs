mod value_macro;
