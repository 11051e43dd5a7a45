// Testes de serviço e HTTP sobre implementações em memória dos colaboradores.

mod helpers;
