// Canonicalização de números de telefone.
//
// Todo número que entra no sistema (destino de ligação, remetente de SMS,
// telefone do paciente) passa por aqui antes de qualquer comparação ou
// gravação. O formato canônico é E.164.

/// Normaliza um número para E.164.
///
/// Regras (produto focado em números norte-americanos):
/// - remove formatação (espaços, parênteses, traços, pontos);
/// - `00` inicial vira `+`;
/// - 11 dígitos começando com `1` ganham o `+`;
/// - 10 dígitos nacionais ganham o prefixo `+1`;
/// - qualquer outra sequência de dígitos ganha apenas o `+`.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let has_plus = trimmed.starts_with('+');

    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return String::new();
    }

    if has_plus {
        return format!("+{}", digits);
    }

    if let Some(rest) = digits.strip_prefix("00") {
        return format!("+{}", rest);
    }

    if digits.len() == 11 && digits.starts_with('1') {
        return format!("+{}", digits);
    }

    if digits.len() == 10 {
        return format!("+1{}", digits);
    }

    format!("+{}", digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_formatacao() {
        assert_eq!(normalize("+1 (555) 123-4567"), "+15551234567");
        assert_eq!(normalize(" +55 11 98765-4321 "), "+5511987654321");
    }

    #[test]
    fn numero_nacional_ganha_codigo_do_pais() {
        assert_eq!(normalize("5551234567"), "+15551234567");
        assert_eq!(normalize("(555) 123-4567"), "+15551234567");
    }

    #[test]
    fn onze_digitos_com_um() {
        assert_eq!(normalize("15551234567"), "+15551234567");
    }

    #[test]
    fn prefixo_internacional_00() {
        assert_eq!(normalize("005511987654321"), "+5511987654321");
    }

    #[test]
    fn ja_canonico_permanece_igual() {
        let canonico = "+15551234567";
        assert_eq!(normalize(canonico), canonico);
        assert_eq!(normalize(&normalize("555-123-4567")), "+15551234567");
    }

    #[test]
    fn entrada_vazia() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
